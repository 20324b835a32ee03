//! # EntiSearch Backend
//!
//! Backend interfaces for EntiSearch.
//!
//! This crate defines the two external collaborators the synchronization
//! engine talks to, as narrow traits:
//!
//! - [`IndexBackend`] - the inverted-index engine (add/update/delete/search)
//! - [`EntityStore`] - the transactional entity store (begin/commit/rollback
//!   plus identity-based loads)
//!
//! Backends are **opaque**: they know nothing about work queues, query
//! builders, or transaction synchronization. The engine owns all of that.
//!
//! ## Available implementations
//!
//! - [`MemoryIndex`] - an in-memory inverted index with term, fuzzy,
//!   wildcard, and boolean queries
//! - [`MemoryStore`] - an in-memory entity store with transaction tokens
//!
//! ## Example
//!
//! ```rust
//! use entisearch_backend::{Document, EntityId, IndexBackend, IndexOperation, MemoryIndex};
//!
//! let index = MemoryIndex::new();
//! let doc = Document::new().with_text("title", "Hello world");
//! index
//!     .apply(&IndexOperation::add("page", EntityId::from("p1"), doc))
//!     .unwrap();
//! ```

mod document;
mod entity;
mod error;
mod index;
mod memory_index;
mod memory_store;
mod query;
mod store;

pub use document::{Document, FieldValue};
pub use entity::{shared, EntityId, SharedEntity, StoredEntity};
pub use error::{BackendError, BackendResult};
pub use index::{IndexBackend, IndexOperation};
pub use memory_index::MemoryIndex;
pub use memory_store::MemoryStore;
pub use query::{BooleanClause, IndexHit, IndexQuery, Occur};
pub use store::{EntityStore, TxToken};
