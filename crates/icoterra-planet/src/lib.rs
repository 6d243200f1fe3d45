//! Planet generation: configuration in, displaced and stitched icosphere out.

mod error;
mod generator;
mod render;
mod topology;

pub use error::PlanetError;
pub use generator::PlanetGenerator;
pub use render::{RenderMesh, RenderPatch, RenderVertex};
pub use topology::PlanetTopology;
