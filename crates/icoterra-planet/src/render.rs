//! GPU-ready per-patch vertex and index buffers.

use icoterra_terrain::{spherical_uv, vertex_color};

use crate::PlanetTopology;

/// A render vertex, 36 bytes.
///
/// Layout:
///   - `[0..12]`  position `[f32; 3]`, displaced surface point
///   - `[12..28]` color `[f32; 4]`, RGBA from elevation
///   - `[28..36]` uv `[f32; 2]`, equirectangular
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(RenderVertex, [u8; 36]);

/// Buffers for one base face.
#[derive(Clone, Debug, Default)]
pub struct RenderPatch {
    pub face: usize,
    pub vertices: Vec<RenderVertex>,
    /// Three indices per triangle into `vertices`, in winding order.
    pub indices: Vec<u32>,
}

impl RenderPatch {
    /// Raw bytes of the vertex buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw bytes of the index buffer.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// One [`RenderPatch`] per base face.
#[derive(Clone, Debug, Default)]
pub struct RenderMesh {
    pub patches: Vec<RenderPatch>,
}

impl RenderMesh {
    /// Pack `planet` for upload. Colors are scaled by the planet's own
    /// deepest and highest points.
    pub fn from_topology(planet: &PlanetTopology) -> Self {
        let range = planet.elevation();
        let max_depth = (-range.min).max(0.0);
        let max_height = range.max.max(0.0);

        let patches = planet
            .patches()
            .iter()
            .map(|patch| {
                let vertices = patch
                    .vertices
                    .iter()
                    .map(|&id| {
                        let v = planet.vertex(id);
                        let [u, w] = spherical_uv(v.position);
                        RenderVertex {
                            position: v.surface.as_vec3().to_array(),
                            color: vertex_color(v.h, max_depth, max_height).map(|c| c as f32),
                            uv: [u as f32, w as f32],
                        }
                    })
                    .collect();
                let indices = patch
                    .triangles
                    .iter()
                    .flat_map(|t| t.vertices().map(|v| v.0))
                    .collect();
                RenderPatch {
                    face: patch.face,
                    vertices,
                    indices,
                }
            })
            .collect();

        Self { patches }
    }

    pub fn vertex_count(&self) -> usize {
        self.patches.iter().map(|p| p.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.patches.iter().map(RenderPatch::triangle_count).sum()
    }
}

impl PlanetTopology {
    /// Shorthand for [`RenderMesh::from_topology`].
    pub fn render_mesh(&self) -> RenderMesh {
        RenderMesh::from_topology(self)
    }
}
