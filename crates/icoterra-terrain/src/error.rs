//! Terrain error types.

use icoterra_mesh::MeshError;

/// Errors from terrain parameter validation and displacement.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// The noise period is zero, negative, or not finite.
    #[error("noise period must be positive and finite, got {0}")]
    NonPositivePeriod(f64),

    /// Fractal noise needs at least one octave.
    #[error("noise octave count must be at least 1")]
    ZeroOctaves,

    /// A gradient entry starts below the one before it.
    #[error("gradient entry {index} starts at {from}, below the previous entry's {previous}")]
    UnorderedGradient { index: usize, from: f64, previous: f64 },

    /// A gradient entry has a negative or non-finite blend width.
    #[error("gradient entry {index} has invalid blend width {width}")]
    NegativeBlendWidth { index: usize, width: f64 },

    /// The planet radius is zero, negative, or not finite.
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// A parallel displacement pass failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}
