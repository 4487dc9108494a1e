//! Error types for world operations

use super::body::BodyId;

/// Errors returned by world mutations and queries
///
/// A blocked move is not an error; see [`MoveOutcome::Collided`](super::MoveOutcome).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// The referenced body is not registered
    #[error("Body not found: {0}")]
    NotFound(BodyId),

    /// Static geometry index past the end of the list
    #[error("Static geometry index {index} out of range (count {len})")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Number of static rectangles at the time of the call
        len: usize,
    },

    /// The allocator has no ids left to hand out
    #[error("Body id space exhausted")]
    IdsExhausted,

    /// `step` was called with a negative time slice
    #[error("Negative time step: {0}")]
    NegativeTimeStep(f32),

    /// NaN or infinite coordinates, velocities, deltas, or time slices
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A reaction handler gave up; the enclosing move or step is aborted
    #[error("Reaction for body {body} failed: {message}")]
    Reaction {
        /// Body whose reaction failed
        body: BodyId,
        /// Handler-supplied reason
        message: String,
    },
}

impl PhysicsError {
    /// Convenience constructor for reaction handlers
    pub fn reaction(body: BodyId, message: impl Into<String>) -> Self {
        Self::Reaction { body, message: message.into() }
    }
}
