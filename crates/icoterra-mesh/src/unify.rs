//! Collapse stitched patches into a single sphere mesh with canonical vertex ids.

use std::collections::BTreeMap;

use crate::disjoint_set::DisjointSet;
use crate::patch::edge_points;
use crate::{EdgeRole, Patch, Triangle, Vertex, VertexId};

/// A patch after unification.
///
/// Keeps the patch's local triangulation so it can still be exported per
/// base face, plus the mapping from local to canonical vertex ids.
#[derive(Clone, Debug)]
pub struct PatchMesh {
    pub face: usize,
    /// Canonical id of every local vertex.
    pub vertices: Vec<VertexId>,
    /// Triangles in local ids, winding and outer marks preserved.
    pub triangles: Vec<Triangle>,
    /// Outer edge triangle lists, as produced by subdivision.
    pub edges: [Vec<u32>; 3],
}

impl PatchMesh {
    /// Triangles rewritten to canonical ids.
    pub fn canonical_triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.triangles
            .iter()
            .map(|t| t.remap(|v| self.vertices[v.index()]))
    }

    /// Canonical vertex ids along the `role` edge.
    pub fn boundary(&self, role: EdgeRole) -> Vec<VertexId> {
        edge_points(&self.triangles, &self.edges[role.index()], role)
            .into_iter()
            .map(|v| self.vertices[v.index()])
            .collect()
    }
}

/// Shape summary of a unified sphere.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SphereStats {
    pub patches: usize,
    pub triangles: usize,
    /// Unique vertices after stitching.
    pub vertices: usize,
    /// Neighbor count → number of vertices with that count.
    pub degrees: BTreeMap<usize, usize>,
    /// Vertices above [`NEIGHBOR_ANOMALY_THRESHOLD`](crate::NEIGHBOR_ANOMALY_THRESHOLD).
    pub anomalies: usize,
}

/// The stitched planet sphere: one vertex per topological point.
#[derive(Clone, Debug)]
pub struct SphereMesh {
    pub radius: f64,
    pub depth: u32,
    /// Canonical vertices with merged neighbor sets.
    pub vertices: Vec<Vertex>,
    pub patches: Vec<PatchMesh>,
    pub stats: SphereStats,
}

impl SphereMesh {
    /// Every triangle of every patch in canonical ids.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.patches.iter().flat_map(PatchMesh::canonical_triangles)
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.stats.triangles
    }
}

/// Resolve the classes in `set` into canonical vertices.
///
/// Class roots are the smallest global id of their class, so canonical ids
/// follow first appearance in patch order. A merged vertex's neighbor set is
/// the union of every duplicate's neighbors, resolved to canonical ids.
pub fn unify(
    patches: Vec<Patch>,
    offsets: &[u32],
    set: &DisjointSet,
    radius: f64,
    depth: u32,
) -> SphereMesh {
    let total = set.len();
    let mut canonical = vec![VertexId(u32::MAX); total];
    let mut vertices: Vec<Vertex> = Vec::new();

    for (face, patch) in patches.iter().enumerate() {
        for (local, vertex) in patch.vertices.iter().enumerate() {
            let g = (offsets[face] as usize) + local;
            let root = set.find(g as u32) as usize;
            if root == g {
                canonical[g] = VertexId(vertices.len() as u32);
                let mut v = vertex.clone();
                v.neighbors.clear();
                vertices.push(v);
            } else {
                canonical[g] = canonical[root];
            }
        }
    }

    for (face, patch) in patches.iter().enumerate() {
        let base = offsets[face] as usize;
        for (local, vertex) in patch.vertices.iter().enumerate() {
            let c = canonical[base + local];
            for n in &vertex.neighbors {
                let nc = canonical[base + n.index()];
                if nc != c {
                    vertices[c.index()].add_neighbor(nc);
                }
            }
        }
    }

    let mut stats = SphereStats {
        patches: patches.len(),
        vertices: vertices.len(),
        ..SphereStats::default()
    };
    for v in &vertices {
        *stats.degrees.entry(v.neighbors.len()).or_default() += 1;
        if v.is_anomalous() {
            stats.anomalies += 1;
        }
    }

    let patches: Vec<PatchMesh> = patches
        .into_iter()
        .enumerate()
        .map(|(face, patch)| {
            let base = offsets[face] as usize;
            stats.triangles += patch.triangles.len();
            PatchMesh {
                face: patch.face,
                vertices: canonical[base..base + patch.vertices.len()].to_vec(),
                triangles: patch.triangles,
                edges: patch.edges,
            }
        })
        .collect();

    if stats.anomalies > 0 {
        tracing::warn!(anomalies = stats.anomalies, "irregular vertices after unification");
    }

    SphereMesh {
        radius,
        depth,
        vertices,
        patches,
        stats,
    }
}
