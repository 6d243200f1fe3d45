//! The generated planet as handed to renderers.

use glam::DVec3;
use icoterra_mesh::{PatchMesh, SphereMesh, SphereStats, Vertex, VertexFlags, VertexId};
use icoterra_terrain::ElevationRange;

/// A stitched, displaced planet.
///
/// Vertices are shared across patches; each patch keeps its own triangle
/// list so consumers can still build one mesh per base face.
#[derive(Clone, Debug)]
pub struct PlanetTopology {
    mesh: SphereMesh,
    elevation: ElevationRange,
}

impl PlanetTopology {
    pub fn new(mesh: SphereMesh, elevation: ElevationRange) -> Self {
        Self { mesh, elevation }
    }

    pub fn radius(&self) -> f64 {
        self.mesh.radius
    }

    pub fn depth(&self) -> u32 {
        self.mesh.depth
    }

    pub fn mesh(&self) -> &SphereMesh {
        &self.mesh
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.mesh.vertices
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        self.mesh.vertex(id)
    }

    pub fn patches(&self) -> &[PatchMesh] {
        &self.mesh.patches
    }

    pub fn stats(&self) -> &SphereStats {
        &self.mesh.stats
    }

    pub fn elevation(&self) -> ElevationRange {
        self.elevation
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Neighbors of `id`, in canonical ids.
    pub fn neighbors(&self, id: VertexId) -> &[VertexId] {
        &self.mesh.vertex(id).neighbors
    }

    /// Displaced corner positions of every triangle in patch `face`, in winding order.
    pub fn triangle_surfaces(&self, face: usize) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.mesh.patches[face]
            .canonical_triangles()
            .map(|t| t.vertices().map(|v| self.mesh.vertex(v).surface))
    }

    /// Share of vertices flagged as water.
    pub fn water_fraction(&self) -> f64 {
        let vertices = self.vertices();
        if vertices.is_empty() {
            return 0.0;
        }
        let water = vertices
            .iter()
            .filter(|v| v.flags.contains(VertexFlags::WATER))
            .count();
        water as f64 / vertices.len() as f64
    }
}
