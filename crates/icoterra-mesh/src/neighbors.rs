//! Neighbor graph construction from triangle connectivity.

use crate::{Patch, Triangle, Vertex};

/// Link every triangle's vertices to each other in both directions.
///
/// Runs on a single patch before stitching, so boundary vertices only see
/// their own face's side of the seam; [`unify`](crate::unify) merges the two
/// halves later. Returns the number of vertices whose degree exceeds
/// [`NEIGHBOR_ANOMALY_THRESHOLD`](crate::NEIGHBOR_ANOMALY_THRESHOLD).
pub fn link_neighbors(patch: &mut Patch) -> usize {
    let Patch {
        face,
        vertices,
        triangles,
        ..
    } = patch;

    link_triangles(vertices, triangles);

    let anomalies = vertices.iter().filter(|v| v.is_anomalous()).count();
    if anomalies > 0 {
        tracing::warn!(
            face = *face,
            anomalies,
            "vertices with more neighbors than a closed triangulation allows"
        );
    }
    anomalies
}

/// Add the three edges of every triangle to `vertices`' neighbor lists.
pub fn link_triangles(vertices: &mut [Vertex], triangles: &[Triangle]) {
    for t in triangles {
        let [a, b, c] = t.vertices();
        for (from, to) in [(a, b), (a, c), (b, a), (b, c), (c, a), (c, b)] {
            vertices[from.index()].add_neighbor(to);
        }
    }
}
