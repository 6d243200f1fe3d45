//! Mesh construction error types.

use crate::EdgeRole;

/// Errors that can occur while tessellating, stitching, or unifying the sphere.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// The target radius is zero, negative, or not finite.
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// The requested subdivision depth would overflow 32-bit vertex indices.
    #[error("subdivision depth {depth} exceeds the supported maximum of {max}")]
    DepthTooLarge { depth: u32, max: u32 },

    /// A midpoint was requested for a parent index the patch does not contain.
    #[error("midpoint parent index {index} out of range for {len} vertices")]
    MidpointIndexOutOfRange { index: u32, len: usize },

    /// Two matched edges carry a different number of boundary points.
    #[error(
        "edge {edge:?} of face {face} has {len} points but edge {other_edge:?} of face {other} has {other_len}"
    )]
    EdgeLengthMismatch {
        face: usize,
        edge: EdgeRole,
        len: usize,
        other: usize,
        other_edge: EdgeRole,
        other_len: usize,
    },

    /// Matched edges diverge somewhere between their endpoints.
    #[error(
        "edge {edge:?} of face {face} and edge {other_edge:?} of face {other} differ at point {point} by {distance}"
    )]
    EdgeEndpointMismatch {
        face: usize,
        edge: EdgeRole,
        other: usize,
        other_edge: EdgeRole,
        point: usize,
        distance: f64,
    },

    /// Endpoints coincide, but in the direction the shared winding rules out.
    #[error("edge {edge:?} of face {face} meets edge {other_edge:?} of face {other} with inverted winding")]
    WindingMismatch {
        face: usize,
        edge: EdgeRole,
        other: usize,
        other_edge: EdgeRole,
    },

    /// After stitching, a base face still has outer edges without a partner.
    #[error("face {face} has {matched} of 3 outer edges stitched")]
    UnmatchedEdges { face: usize, matched: usize },

    /// A stitching worker panicked while holding the corner lock.
    #[error("corner lock poisoned by a panicking stitch worker")]
    StitchLockPoisoned,

    /// A worker thread could not be started.
    #[error("failed to spawn a worker for the {stage} stage: {source}")]
    WorkerSpawn {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// A worker thread panicked; the partial result is discarded.
    #[error("a worker panicked during the {stage} stage")]
    WorkerPanicked { stage: &'static str },
}
