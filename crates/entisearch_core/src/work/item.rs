//! One pending index mutation.

use entisearch_backend::{Document, EntityId, IndexOperation};

/// Kind of a pending index mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkKind {
    /// Index a document new to the index.
    Add,
    /// Replace the indexed document.
    Update,
    /// Remove the indexed document.
    Delete,
}

/// One pending index mutation tied to an entity identity.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    kind: WorkKind,
    entity_type: String,
    id: EntityId,
    document: Option<Document>,
}

impl WorkItem {
    /// Creates a pending add.
    pub fn add(entity_type: impl Into<String>, id: EntityId, document: Document) -> Self {
        Self {
            kind: WorkKind::Add,
            entity_type: entity_type.into(),
            id,
            document: Some(document),
        }
    }

    /// Creates a pending update.
    pub fn update(entity_type: impl Into<String>, id: EntityId, document: Document) -> Self {
        Self {
            kind: WorkKind::Update,
            entity_type: entity_type.into(),
            id,
            document: Some(document),
        }
    }

    /// Creates a pending delete.
    pub fn delete(entity_type: impl Into<String>, id: EntityId) -> Self {
        Self {
            kind: WorkKind::Delete,
            entity_type: entity_type.into(),
            id,
            document: None,
        }
    }

    /// Returns the mutation kind.
    #[must_use]
    pub fn kind(&self) -> WorkKind {
        self.kind
    }

    /// Returns the entity kind of the target.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Returns the identifier of the target.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Returns the document, present for add and update.
    #[must_use]
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Returns the `(entity_type, id)` coalescing key.
    #[must_use]
    pub fn key(&self) -> (String, EntityId) {
        (self.entity_type.clone(), self.id.clone())
    }

    /// Converts into the operation handed to the index engine.
    #[must_use]
    pub fn into_operation(self) -> IndexOperation {
        match (self.kind, self.document) {
            (WorkKind::Add, Some(document)) => {
                IndexOperation::add(self.entity_type, self.id, document)
            }
            (WorkKind::Update, Some(document)) => {
                IndexOperation::update(self.entity_type, self.id, document)
            }
            // Delete never carries a document; add/update always do,
            // their constructors guarantee it.
            _ => IndexOperation::delete(self.entity_type, self.id),
        }
    }

    /// Rewrites this item's kind, keeping target and document.
    pub(crate) fn with_kind(mut self, kind: WorkKind) -> Self {
        self.kind = kind;
        self
    }
}
