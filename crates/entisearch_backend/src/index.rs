//! Index backend trait and mutation operations.

use crate::document::Document;
use crate::entity::EntityId;
use crate::error::BackendResult;
use crate::query::{IndexHit, IndexQuery};

/// One mutation handed to the index engine.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexOperation {
    /// Index a document that is new to the index.
    Add {
        /// Entity kind.
        entity_type: String,
        /// Identifier within the kind.
        id: EntityId,
        /// Index representation.
        document: Document,
    },
    /// Replace the indexed document for an existing identity.
    Update {
        /// Entity kind.
        entity_type: String,
        /// Identifier within the kind.
        id: EntityId,
        /// Index representation.
        document: Document,
    },
    /// Remove the indexed document for an identity.
    Delete {
        /// Entity kind.
        entity_type: String,
        /// Identifier within the kind.
        id: EntityId,
    },
}

impl IndexOperation {
    /// Creates an add operation.
    pub fn add(entity_type: impl Into<String>, id: EntityId, document: Document) -> Self {
        Self::Add {
            entity_type: entity_type.into(),
            id,
            document,
        }
    }

    /// Creates an update operation.
    pub fn update(entity_type: impl Into<String>, id: EntityId, document: Document) -> Self {
        Self::Update {
            entity_type: entity_type.into(),
            id,
            document,
        }
    }

    /// Creates a delete operation.
    pub fn delete(entity_type: impl Into<String>, id: EntityId) -> Self {
        Self::Delete {
            entity_type: entity_type.into(),
            id,
        }
    }

    /// Returns the `(entity_type, id)` identity the operation targets.
    #[must_use]
    pub fn target(&self) -> (&str, &EntityId) {
        match self {
            Self::Add {
                entity_type, id, ..
            }
            | Self::Update {
                entity_type, id, ..
            }
            | Self::Delete { entity_type, id } => (entity_type, id),
        }
    }
}

/// The inverted-index engine, as a black box.
///
/// Implementations own the physical index format, the analyzer, and their
/// own concurrency control. `apply` is idempotent per call: adding an
/// already-indexed identity re-indexes it, deleting a missing identity is
/// a no-op.
pub trait IndexBackend: Send + Sync {
    /// Applies one mutation to the index.
    fn apply(&self, operation: &IndexOperation) -> BackendResult<()>;

    /// Executes a query over documents of one entity type.
    ///
    /// Hits come back score-descending; ties are broken by the engine's
    /// internal document order, which is stable between mutations but not
    /// meaningful across rebuilds.
    fn search(&self, query: &IndexQuery, entity_type: &str) -> BackendResult<Vec<IndexHit>>;
}
