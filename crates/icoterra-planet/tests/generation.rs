//! End-to-end generation tests.

use icoterra_config::Config;
use icoterra_mesh::{EdgeRole, MAX_DEPTH, SphereBuilder, VertexFlags, VertexId};
use icoterra_planet::{PlanetError, PlanetGenerator, PlanetTopology};

const EPSILON: f64 = 1e-9;

fn generate(radius: f64, subdivisions: u32, workers: usize) -> PlanetTopology {
    let mut config = Config::standard();
    config.planet.radius = radius;
    config.planet.subdivisions = subdivisions;
    config.noise.period = 0.42 * radius;
    config.runtime.workers = workers;
    PlanetGenerator::new(config).unwrap().generate().unwrap()
}

#[test]
fn test_radius_ten_depth_one_counts() {
    let patches = SphereBuilder::new(10.0, 1).build_patches().unwrap();
    for p in &patches {
        assert_eq!(p.triangles.len(), 4);
        assert_eq!(p.vertices.len(), 6);
    }
    let unstitched: usize = patches.iter().map(|p| p.vertices.len()).sum();
    assert_eq!(unstitched, 120);

    let planet = generate(10.0, 1, 0);
    assert_eq!(planet.triangle_count(), 80);
    assert_eq!(planet.vertex_count(), 42);
    assert_eq!(planet.stats().degrees[&5], 12);
    assert_eq!(planet.stats().degrees[&6], 30);
}

#[test]
fn test_depth_zero_is_the_icosahedron() {
    let planet = generate(3.0, 0, 2);
    assert_eq!(planet.vertex_count(), 12);
    assert_eq!(planet.triangle_count(), 20);
    for p in planet.patches() {
        assert_eq!(p.vertices.len(), 3);
        assert_eq!(p.triangles.len(), 1);
    }
    for (i, v) in planet.vertices().iter().enumerate() {
        assert_eq!(planet.neighbors(VertexId(i as u32)).len(), 5);
        assert!((v.position.length() - 3.0).abs() < EPSILON);
    }
}

#[test]
fn test_norms_before_and_after_displacement() {
    for (radius, depth) in [(1.0, 2), (10.0, 3), (6371.0, 2)] {
        let planet = generate(radius, depth, 0);
        for v in planet.vertices() {
            assert!(
                (v.position.length() - radius).abs() < EPSILON * radius,
                "base position off the sphere"
            );
            assert!(
                (v.surface.length() - (radius + v.h)).abs() < EPSILON * radius,
                "surface not displaced radially by h"
            );
        }
    }
}

#[test]
fn test_generation_is_bit_identical() {
    let a = generate(10.0, 3, 1);
    let b = generate(10.0, 3, 0);
    assert_eq!(a.vertex_count(), b.vertex_count());
    for (x, y) in a.vertices().iter().zip(b.vertices()) {
        assert_eq!(x.position.to_array(), y.position.to_array());
        assert_eq!(x.surface.to_array(), y.surface.to_array());
        assert_eq!(x.h.to_bits(), y.h.to_bits());
        assert_eq!(x.neighbors, y.neighbors);
    }
}

#[test]
fn test_shared_edges_use_shared_vertices() {
    let planet = generate(10.0, 3, 0);
    let patches = planet.patches();
    let mut matched = 0;
    for (i, p) in patches.iter().enumerate() {
        for q in &patches[i + 1..] {
            for a in EdgeRole::ALL {
                for b in EdgeRole::ALL {
                    let x = p.boundary(a);
                    let mut y = q.boundary(b);
                    if x.first() == y.last() {
                        y.reverse();
                    }
                    if x == y {
                        matched += 1;
                    }
                }
            }
        }
    }
    assert_eq!(matched, 30);
}

#[test]
fn test_water_flags_follow_elevation() {
    let planet = generate(10.0, 4, 0);
    for v in planet.vertices() {
        assert_eq!(v.flags.contains(VertexFlags::WATER), v.h < 0.0);
        assert!(v.landscape.is_some());
    }
    let range = planet.elevation();
    assert!(range.min <= range.max);
    let water = planet.water_fraction();
    assert!((0.0..=1.0).contains(&water));
}

#[test]
fn test_render_mesh_matches_topology() {
    let planet = generate(10.0, 2, 0);
    let render = planet.render_mesh();
    assert_eq!(render.patches.len(), 20);
    assert_eq!(render.triangle_count(), planet.triangle_count());
    assert_eq!(render.vertex_count(), 20 * 15);
    for (patch, rp) in planet.patches().iter().zip(&render.patches) {
        assert_eq!(rp.face, patch.face);
        assert!(rp.indices.iter().all(|&i| (i as usize) < rp.vertices.len()));
        for v in &rp.vertices {
            assert!(v.color.iter().all(|c| (0.0..=1.0).contains(c)));
            assert!((-0.5..=0.5).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
        let surfaces: Vec<_> = planet.triangle_surfaces(patch.face).collect();
        assert_eq!(surfaces.len(), rp.triangle_count());
    }
}

#[test]
fn test_bad_requests_fail_loudly() {
    let mut config = Config::standard();
    config.planet.subdivisions = MAX_DEPTH + 1;
    assert!(matches!(
        PlanetGenerator::new(config),
        Err(PlanetError::Config(_))
    ));

    let mut config = Config::standard();
    config.noise.period = 0.0;
    assert!(matches!(
        PlanetGenerator::new(config),
        Err(PlanetError::Config(_))
    ));

    let config = Config::from_ron_str("(planet: (radius: -1.0))").unwrap();
    let err = PlanetGenerator::new(config).err().unwrap();
    assert!(err.to_string().contains("planet.radius"));
}
