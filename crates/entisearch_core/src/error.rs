//! Error types for the synchronization engine.

use entisearch_backend::{BackendError, EntityId};
use thiserror::Error;

/// Result type for engine operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the synchronization engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed input to the query DSL or a constructor.
    ///
    /// Raised at the offending call, never deferred to execution.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the input.
        message: String,
    },

    /// Protocol violation: an operation was issued in a state that does
    /// not permit it.
    #[error("illegal state: {message}")]
    IllegalState {
        /// Which rule was violated.
        message: String,
    },

    /// The index engine rejected a work item during flush, after the
    /// store transaction had already committed.
    ///
    /// The index is now known to diverge from the store for the named
    /// identity. The drained queue is gone, so the flush is never retried;
    /// the owner of the transaction boundary decides on repair.
    #[error(
        "index synchronization failed on {entity_type}#{id} after {applied} applied item(s): {source}"
    )]
    Synchronization {
        /// Work items already applied before the failure.
        applied: usize,
        /// Entity kind of the failing item.
        entity_type: String,
        /// Identifier of the failing item.
        id: EntityId,
        /// The backend rejection.
        source: BackendError,
    },

    /// A store or index failure outside the flush window.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl CoreError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an illegal state error.
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState {
            message: message.into(),
        }
    }
}
