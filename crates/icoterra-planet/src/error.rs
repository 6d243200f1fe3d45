//! Planet generation error types.

use icoterra_config::ConfigError;
use icoterra_mesh::MeshError;
use icoterra_terrain::TerrainError;

/// Errors that abort a generation request.
#[derive(Debug, thiserror::Error)]
pub enum PlanetError {
    /// The configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Building or stitching the sphere failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Noise or gradient setup, or the displacement pass, failed.
    #[error(transparent)]
    Terrain(#[from] TerrainError),
}
