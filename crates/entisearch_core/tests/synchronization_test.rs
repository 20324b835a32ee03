//! Transactional visibility of index work.

use entisearch_backend::{
    BackendError, BackendResult, EntityId, IndexBackend, IndexHit, IndexOperation, IndexQuery,
    MemoryIndex, MemoryStore,
};
use entisearch_core::{CoreError, QueryBuilder, Session};
use entisearch_testkit::fixtures::{month_document, TestHarness, MONTH};
use parking_lot::Mutex;
use std::sync::Arc;

fn whitening() -> IndexQuery {
    QueryBuilder::term().on("mythology").matches("whitening").create_query()
}

#[test]
fn add_becomes_visible_on_commit() {
    let harness = TestHarness::new();

    harness.session.begin().unwrap();
    harness
        .session
        .add(
            MONTH,
            EntityId::from("jan"),
            month_document("January", "Month of colder and whitening", ""),
        )
        .unwrap();

    // Not visible before commit.
    assert_eq!(harness.session.search(&whitening(), MONTH).unwrap().count(), 0);

    harness.session.commit().unwrap();
    assert_eq!(harness.session.search(&whitening(), MONTH).unwrap().count(), 1);
}

#[test]
fn rollback_discards_all_enqueued_work() {
    let harness = TestHarness::new();

    harness.session.begin().unwrap();
    harness
        .session
        .add(
            MONTH,
            EntityId::from("jan"),
            month_document("January", "Month of colder and whitening", ""),
        )
        .unwrap();
    harness.session.purge(MONTH, EntityId::from("feb")).unwrap();
    harness.session.rollback().unwrap();

    assert_eq!(harness.index.document_count(MONTH), 0);
    assert_eq!(harness.session.search(&whitening(), MONTH).unwrap().count(), 0);
}

#[test]
fn delete_after_commit_removes_the_hit() {
    let harness = TestHarness::new();

    harness.session.begin().unwrap();
    harness
        .session
        .add(
            MONTH,
            EntityId::from("jan"),
            month_document("January", "Month of colder and whitening", ""),
        )
        .unwrap();
    harness.session.commit().unwrap();
    assert_eq!(harness.session.search(&whitening(), MONTH).unwrap().count(), 1);

    harness.session.begin().unwrap();
    harness.session.purge(MONTH, EntityId::from("jan")).unwrap();
    harness.session.commit().unwrap();
    assert_eq!(harness.session.search(&whitening(), MONTH).unwrap().count(), 0);
}

#[test]
fn add_then_delete_in_one_transaction_cancels() {
    let harness = TestHarness::new();

    harness.session.begin().unwrap();
    harness
        .session
        .add(
            MONTH,
            EntityId::from("jan"),
            month_document("January", "Month of colder and whitening", ""),
        )
        .unwrap();
    harness.session.purge(MONTH, EntityId::from("jan")).unwrap();
    harness.session.commit().unwrap();

    assert_eq!(harness.index.document_count(MONTH), 0);
}

#[test]
fn update_within_transaction_wins_over_earlier_add() {
    let harness = TestHarness::new();

    harness.session.begin().unwrap();
    harness
        .session
        .add(
            MONTH,
            EntityId::from("jan"),
            month_document("January", "first version", ""),
        )
        .unwrap();
    harness
        .session
        .update(
            MONTH,
            EntityId::from("jan"),
            month_document("January", "Month of colder and whitening", ""),
        )
        .unwrap();
    harness.session.commit().unwrap();

    // Only the final document is in the index.
    assert_eq!(harness.index.document_count(MONTH), 1);
    assert_eq!(harness.session.search(&whitening(), MONTH).unwrap().count(), 1);
    let first = QueryBuilder::term().on("mythology").matches("first").create_query();
    assert_eq!(harness.session.search(&first, MONTH).unwrap().count(), 0);
}

/// Index backend that counts applies and rejects a chosen identity.
struct FlakyIndex {
    inner: MemoryIndex,
    applies: Mutex<usize>,
    reject: EntityId,
}

impl FlakyIndex {
    fn rejecting(id: EntityId) -> Self {
        Self {
            inner: MemoryIndex::new(),
            applies: Mutex::new(0),
            reject: id,
        }
    }
}

impl IndexBackend for FlakyIndex {
    fn apply(&self, operation: &IndexOperation) -> BackendResult<()> {
        let (entity_type, id) = operation.target();
        if id == &self.reject {
            return Err(BackendError::index_rejected(
                entity_type,
                id.clone(),
                "simulated engine failure",
            ));
        }
        *self.applies.lock() += 1;
        self.inner.apply(operation)
    }

    fn search(&self, query: &IndexQuery, entity_type: &str) -> BackendResult<Vec<IndexHit>> {
        self.inner.search(query, entity_type)
    }
}

#[test]
fn flush_failure_surfaces_after_store_commit() {
    let store = Arc::new(MemoryStore::new());
    let index = Arc::new(FlakyIndex::rejecting(EntityId::from("feb")));
    let session = Session::new(store.clone(), index.clone());

    session.begin().unwrap();
    session
        .add(MONTH, EntityId::from("jan"), month_document("January", "colder", ""))
        .unwrap();
    session
        .add(MONTH, EntityId::from("feb"), month_document("February", "snow", ""))
        .unwrap();
    let err = session.commit().unwrap_err();

    match err {
        CoreError::Synchronization {
            applied,
            entity_type,
            id,
            ..
        } => {
            assert_eq!(applied, 1);
            assert_eq!(entity_type, MONTH);
            assert_eq!(id, EntityId::from("feb"));
        }
        other => panic!("expected synchronization failure, got {other:?}"),
    }

    // The store transaction stands; only the index diverged, and only the
    // item before the failure reached it.
    assert!(!session.in_transaction());
    assert_eq!(*index.applies.lock(), 1);
}

#[test]
fn commit_with_no_index_work_touches_nothing() {
    let harness = TestHarness::new();
    harness.session.begin().unwrap();
    harness.session.commit().unwrap();
    assert_eq!(harness.index.document_count(MONTH), 0);
}
