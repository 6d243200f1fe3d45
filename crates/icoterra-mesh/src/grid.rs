//! Row-by-row subdivision over a triangular grid.
//!
//! Produces the same vertex positions and triangle count as
//! [`subdivide_face`](crate::subdivide_face) without a midpoint cache, but
//! keeps no outer-edge lists, so its patches cannot be stitched.

use glam::DVec3;

use crate::subdivision::{check_inputs, patch_triangle_count, patch_vertex_count};
use crate::{MeshError, Patch, Triangle, Vertex, VertexId};

/// Grid index of row `i`, column `j` (`j <= i`).
#[inline]
fn grid_index(i: usize, j: usize) -> VertexId {
    VertexId((i * (i + 1) / 2 + j) as u32)
}

/// Subdivide base face `face` into `2^depth` segments per edge, row by row.
///
/// Row `i` walks from the AB edge toward the AC edge; every grid point is
/// projected onto the sphere of `radius`. Each grid cell contributes a
/// corner-facing triangle and, away from the row end, an edge-facing one.
///
/// # Errors
///
/// Returns [`MeshError::InvalidRadius`] or [`MeshError::DepthTooLarge`].
pub fn subdivide_grid(
    face: usize,
    corners: [DVec3; 3],
    depth: u32,
    radius: f64,
) -> Result<Patch, MeshError> {
    check_inputs(depth, radius)?;

    let m = 1usize << depth;
    let [a, b, c] = corners;
    let step_b = (b - a) / m as f64;
    let step_c = (c - a) / m as f64;

    let mut patch = Patch::with_capacity(
        face,
        patch_vertex_count(depth),
        patch_triangle_count(depth),
    );
    for i in 0..=m {
        for j in 0..=i {
            let point = match (i, j) {
                (0, 0) => a,
                (i, 0) if i == m => b,
                (i, j) if i == m && j == m => c,
                _ => a + step_b * (i - j) as f64 + step_c * j as f64,
            };
            patch.vertices.push(Vertex::on_sphere(point, radius));
        }
    }

    for i in 1..=m {
        for j in 0..i {
            patch.triangles.push(Triangle::new(
                grid_index(i - 1, j),
                grid_index(i, j),
                grid_index(i, j + 1),
            ));
            if j + 1 < i {
                patch.triangles.push(Triangle::new(
                    grid_index(i - 1, j),
                    grid_index(i, j + 1),
                    grid_index(i - 1, j + 1),
                ));
            }
        }
    }

    Ok(patch)
}
