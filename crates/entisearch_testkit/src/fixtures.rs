//! Test fixtures and session helpers.
//!
//! The canonical fixture is a pair of "month" entities with mythology and
//! history text, small enough to reason about by hand yet rich enough to
//! exercise analyzed terms, fuzzy matches, wildcards, boolean boosts, and
//! projections.

use entisearch_backend::{Document, EntityId, MemoryIndex, MemoryStore, StoredEntity};
use entisearch_core::Session;
use serde_json::json;
use std::sync::Arc;

/// Entity type used by the month fixture.
pub const MONTH: &str = "month";

/// A store, an index, and a session over both.
pub struct TestHarness {
    /// The in-memory entity store.
    pub store: Arc<MemoryStore>,
    /// The in-memory index backend.
    pub index: Arc<MemoryIndex>,
    /// A session over the two.
    pub session: Session,
}

impl TestHarness {
    /// Creates an empty harness.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let index = Arc::new(MemoryIndex::new());
        let session = Session::new(store.clone(), index.clone());
        Self {
            store,
            index,
            session,
        }
    }

    /// Creates a harness seeded with the two month entities, indexed
    /// through a committed transaction.
    #[must_use]
    pub fn with_months() -> Self {
        let harness = Self::new();
        harness.seed_months();
        harness
    }

    /// Persists and indexes the month fixture inside one committed
    /// transaction.
    pub fn seed_months(&self) {
        self.session.begin().expect("begin seeding transaction");
        for (id, name, mythology, history) in month_rows() {
            self.store.put(
                StoredEntity::new(MONTH, id)
                    .with_field("name", name)
                    .with_field("mythology", mythology)
                    .with_field("history", history),
            );
            self.session
                .add(MONTH, EntityId::from(id), month_document(name, mythology, history))
                .expect("enqueue month");
        }
        self.session.commit().expect("commit seeding transaction");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// The raw month rows: `(id, name, mythology, history)`.
#[must_use]
pub fn month_rows() -> [(&'static str, &'static str, &'static str, &'static str); 2] {
    [
        (
            "jan",
            "January",
            "Month of colder and whitening",
            "Historically colder than any other month in the northern hemisphere",
        ),
        (
            "feb",
            "February",
            "Month of snowboarding",
            "Historically, the month where we make babies while watching the whitening landscape",
        ),
    ]
}

/// Builds the index document for one month.
#[must_use]
pub fn month_document(name: &str, mythology: &str, history: &str) -> Document {
    Document::new()
        .with_stored("name", name, json!(name))
        .with_text("mythology", mythology)
        .with_text("history", history)
}
