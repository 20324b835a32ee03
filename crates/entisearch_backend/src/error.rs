//! Error types for EntiSearch backends.

use crate::entity::EntityId;
use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors that can occur in index or store backends.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The index engine rejected a mutation.
    #[error("index rejected {entity_type}#{id}: {message}")]
    IndexRejected {
        /// Entity kind of the rejected document.
        entity_type: String,
        /// Identifier of the rejected document.
        id: EntityId,
        /// Description of the rejection.
        message: String,
    },

    /// The index engine could not execute a query.
    #[error("query execution failed: {message}")]
    QueryFailed {
        /// Description of the failure.
        message: String,
    },

    /// The store does not know the given transaction token.
    #[error("unknown transaction token {token}")]
    UnknownTransaction {
        /// The offending token value.
        token: u64,
    },

    /// The transaction behind the token has already committed or rolled back.
    #[error("transaction {token} already finished")]
    TransactionFinished {
        /// The offending token value.
        token: u64,
    },

    /// The store failed for a reason of its own.
    #[error("store error: {message}")]
    Store {
        /// Description of the failure.
        message: String,
    },
}

impl BackendError {
    /// Creates an index rejection error.
    pub fn index_rejected(
        entity_type: impl Into<String>,
        id: EntityId,
        message: impl Into<String>,
    ) -> Self {
        Self::IndexRejected {
            entity_type: entity_type.into(),
            id,
            message: message.into(),
        }
    }

    /// Creates a query failure error.
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed {
            message: message.into(),
        }
    }

    /// Creates a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}
