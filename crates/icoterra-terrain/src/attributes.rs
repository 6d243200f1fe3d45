//! Per-vertex render attributes derived from position and elevation.

use std::f64::consts::PI;

use glam::DVec3;

/// Equirectangular UV of `position`'s direction: `u` from longitude in
/// `[-0.5, 0.5]`, `v` from latitude in `[0, 1]`.
pub fn spherical_uv(position: DVec3) -> [f64; 2] {
    let d = position.normalize_or_zero();
    [
        d.z.atan2(d.x) / (2.0 * PI),
        d.y.clamp(-1.0, 1.0).asin() / PI + 0.5,
    ]
}

/// RGBA color for elevation `h`.
///
/// Below sea level the color ramps through blues, scaled by `max_depth`
/// (the magnitude of the deepest point). Above it, it moves from green
/// toward brown, scaled by `max_height`.
pub fn vertex_color(h: f64, max_depth: f64, max_height: f64) -> [f64; 4] {
    if h < 0.0 {
        let t = normalized(-h, max_depth);
        let [r, g, b] = hsv_to_rgb(2.0 / 3.0, 2.0 * t + 0.25, 1.5 - t.min(0.5));
        [r, g, b, 1.0]
    } else {
        let t = normalized(h, max_height);
        let [r, g, b] = hsv_to_rgb(
            0.69 - (t * 0.5).max(0.35),
            0.69 - 0.88 * t,
            0.7 + t * 0.33,
        );
        [r, g, b, 1.0]
    }
}

fn normalized(x: f64, scale: f64) -> f64 {
    if scale > 0.0 { (x / scale).min(1.0) } else { 0.0 }
}

/// Convert hue, saturation and value (all in `[0, 1]`, clamped) to RGB.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    let h = h.rem_euclid(1.0) * 6.0;
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as u32 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}
