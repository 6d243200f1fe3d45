//! Per-base-face subdivision output.

use glam::DVec3;

use crate::{EdgeRole, Triangle, Vertex, VertexId};

/// The fine triangulation of one icosahedron face.
///
/// Owns copies of the vertices on its three outer edges; stitching later
/// unifies those copies with the neighboring patches'.
/// Walk the `cells` of one outer edge and collect its vertex ids in order:
/// the leading corner of every cell, then the trailing corner of the last.
pub(crate) fn edge_points(
    triangles: &[Triangle],
    cells: &[u32],
    role: EdgeRole,
) -> Vec<VertexId> {
    let mut points: Vec<VertexId> = cells
        .iter()
        .map(|&cell| {
            let t = &triangles[cell as usize];
            match role {
                EdgeRole::AB | EdgeRole::CA => t.a,
                EdgeRole::BC => t.b,
            }
        })
        .collect();
    if let Some(&last) = cells.last() {
        let t = &triangles[last as usize];
        points.push(match role {
            EdgeRole::AB => t.b,
            EdgeRole::BC | EdgeRole::CA => t.c,
        });
    }
    points
}

#[derive(Clone, Debug)]
pub struct Patch {
    /// Index of the base face this patch was subdivided from.
    pub face: usize,
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    /// Triangle indices lying on each outer edge, indexed by [`EdgeRole::index`],
    /// ordered by position along the edge.
    pub edges: [Vec<u32>; 3],
}

impl Patch {
    /// An empty patch with room for the given number of vertices and triangles.
    pub fn with_capacity(face: usize, vertices: usize, triangles: usize) -> Self {
        Self {
            face,
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
            edges: [Vec::new(), Vec::new(), Vec::new()],
        }
    }

    /// Triangle indices along the `role` edge.
    pub fn edge_triangles(&self, role: EdgeRole) -> &[u32] {
        &self.edges[role.index()]
    }

    /// Vertex ids along the `role` edge, endpoints included.
    ///
    /// AB runs from A to B, BC from B to C, and CA from A to C. A depth-0
    /// patch yields just the two corners.
    pub fn boundary(&self, role: EdgeRole) -> Vec<VertexId> {
        edge_points(&self.triangles, self.edge_triangles(role), role)
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    #[inline]
    pub fn position(&self, id: VertexId) -> DVec3 {
        self.vertices[id.index()].position
    }
}
