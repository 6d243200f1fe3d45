//! Planet terrain: fractal noise elevation, landscape gradient, and render attributes.

mod attributes;
mod displacement;
mod error;
mod fractal;
mod gradient;

pub use attributes::{hsv_to_rgb, spherical_uv, vertex_color};
pub use displacement::{DisplacementField, DisplacementSample, ElevationRange};
pub use error::TerrainError;
pub use fractal::{FractalNoise, FractalNoiseParams};
pub use gradient::{GradientEntry, GradientSample, GradientTable};
