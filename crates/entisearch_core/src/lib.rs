//! # EntiSearch Core
//!
//! Transactional full-text index synchronization for entity stores.
//!
//! This crate keeps an inverted index consistent with a transactional
//! entity store and turns index hits back into usable results:
//!
//! - Query DSL ([`query`]) - fluent, immutable construction of term,
//!   fuzzy, wildcard, and boolean queries
//! - Work queue ([`work`]) - per-transaction buffer of pending index
//!   mutations, coalesced by entity identity
//! - Transaction synchronizer ([`sync`]) - flushes the queue when the
//!   store transaction commits, discards it on rollback
//! - Session ([`session`]) - the entry point tying a store, an index,
//!   and one transaction at a time together
//! - Result loader ([`loader`]) - maps hits to [`EntityInfo`] and
//!   resolves them against the store and the transaction's identity scope
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use entisearch_backend::{Document, EntityId, MemoryIndex, MemoryStore};
//! use entisearch_core::{QueryBuilder, Session};
//!
//! let store = Arc::new(MemoryStore::new());
//! let index = Arc::new(MemoryIndex::new());
//! let session = Session::new(store, index);
//!
//! session.begin().unwrap();
//! let doc = Document::new().with_text("title", "a winter month");
//! session.add("month", EntityId::from("jan"), doc).unwrap();
//! session.commit().unwrap();
//!
//! session.begin().unwrap();
//! let query = QueryBuilder::term().on("title").matches("winter").create_query();
//! let hits = session.search(&query, "month").unwrap();
//! assert_eq!(hits.count(), 1);
//! session.rollback().unwrap();
//! ```

mod entity_info;
mod error;
pub mod loader;
pub mod query;
pub mod session;
pub mod sync;
pub mod transaction;
pub mod work;

pub use entity_info::{EntityInfo, Projected};
pub use error::{CoreError, CoreResult};
pub use loader::{HitSequence, Loader, QueryOutcome, SELF_FIELD};
pub use query::QueryBuilder;
pub use session::Session;
pub use sync::{IndexSynchronizer, SyncPhase};
pub use transaction::{IdentityScope, TransactionContext, TransactionParticipant};
pub use work::{WorkItem, WorkKind, WorkQueue};
