//! Icosphere planet meshes: icosahedron base, recursive subdivision, neighbor
//! graph, and edge stitching into a single sphere with shared vertices.

mod error;
mod grid;
mod icosahedron;
mod neighbors;
mod patch;
mod sphere;
mod subdivision;
mod triangle;
mod vertex;

pub mod disjoint_set;
pub mod parallel;
pub mod stitch;
pub mod unify;

pub use disjoint_set::DisjointSet;
pub use error::MeshError;
pub use grid::subdivide_grid;
pub use icosahedron::{CORNER_COUNT, FACE_COUNT, Icosahedron};
pub use neighbors::{link_neighbors, link_triangles};
pub use patch::Patch;
pub use sphere::SphereBuilder;
pub use stitch::{EdgePairing, Seam, Traversal, stitch};
pub use subdivision::{
    MAX_DEPTH, MidpointCache, patch_triangle_count, patch_vertex_count, subdivide_face,
};
pub use triangle::{EdgeMask, EdgeRole, Triangle};
pub use unify::{PatchMesh, SphereMesh, SphereStats, unify};
pub use vertex::{
    LandscapeClass, LandscapeType, NEIGHBOR_ANOMALY_THRESHOLD, Vertex, VertexFlags, VertexId,
    project_to_sphere,
};
