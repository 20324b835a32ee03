//! Result loading through a session: identity scope reuse, stale hits,
//! and projections.

use entisearch_backend::{EntityId, EntityStore};
use entisearch_core::{CoreError, QueryBuilder, SELF_FIELD};
use entisearch_testkit::fixtures::{TestHarness, MONTH};
use serde_json::json;
use std::sync::Arc;

fn colder() -> entisearch_backend::IndexQuery {
    QueryBuilder::term().on("mythology").matches("colder").create_query()
}

#[test]
fn search_and_load_returns_full_entities() {
    let harness = TestHarness::with_months();

    harness.session.begin().unwrap();
    let infos = harness.session.search(&colder(), MONTH).unwrap();
    let outcomes = harness.session.load(infos).unwrap();
    harness.session.rollback().unwrap();

    assert_eq!(outcomes.len(), 1);
    let entity = outcomes[0].as_entity().unwrap();
    assert_eq!(entity.read().field("name"), Some(&json!("January")));
}

#[test]
fn load_requires_an_active_transaction() {
    let harness = TestHarness::with_months();
    let infos = harness.session.search(&colder(), MONTH).unwrap();
    let result = harness.session.load(infos);
    assert!(matches!(result, Err(CoreError::IllegalState { .. })));
}

#[test]
fn managed_instance_is_reused_with_in_flight_changes() {
    let harness = TestHarness::with_months();

    harness.session.begin().unwrap();
    let managed = harness
        .store
        .load_by_identity(MONTH, &EntityId::from("jan"))
        .unwrap()
        .unwrap();
    managed.write().fields.insert("name".into(), json!("Janvier"));
    harness.session.attach(managed.clone()).unwrap();

    let infos = harness.session.search(&colder(), MONTH).unwrap();
    let outcomes = harness.session.load(infos).unwrap();
    harness.session.rollback().unwrap();

    let entity = outcomes[0].as_entity().unwrap();
    assert!(Arc::ptr_eq(entity, &managed));
    assert_eq!(entity.read().field("name"), Some(&json!("Janvier")));
}

#[test]
fn identity_scope_does_not_outlive_the_transaction() {
    let harness = TestHarness::with_months();

    harness.session.begin().unwrap();
    let managed = harness
        .store
        .load_by_identity(MONTH, &EntityId::from("jan"))
        .unwrap()
        .unwrap();
    harness.session.attach(managed.clone()).unwrap();
    harness.session.rollback().unwrap();

    // A fresh transaction loads its own instance.
    harness.session.begin().unwrap();
    let infos = harness.session.search(&colder(), MONTH).unwrap();
    let outcomes = harness.session.load(infos).unwrap();
    harness.session.rollback().unwrap();

    let entity = outcomes[0].as_entity().unwrap();
    assert!(!Arc::ptr_eq(entity, &managed));
}

#[test]
fn stale_hit_shrinks_the_result() {
    let harness = TestHarness::with_months();
    harness.store.remove(MONTH, &EntityId::from("jan"));

    harness.session.begin().unwrap();
    let infos = harness.session.search(&colder(), MONTH).unwrap();
    assert_eq!(infos.remaining(), 1);
    let outcomes = harness.session.load(infos).unwrap();
    harness.session.rollback().unwrap();

    assert!(outcomes.is_empty());
}

#[test]
fn projection_with_self_field_through_the_session() {
    let harness = TestHarness::with_months();

    harness.session.begin().unwrap();
    let infos = harness
        .session
        .search_projected(&colder(), MONTH, &[SELF_FIELD, "name", "unstored"])
        .unwrap();
    let outcomes = harness.session.load(infos).unwrap();
    harness.session.rollback().unwrap();

    assert_eq!(outcomes.len(), 1);
    let projection = outcomes[0].as_projection().unwrap();
    let entity = projection[0].as_entity().expect("self slot populated");
    assert_eq!(entity.read().field("name"), Some(&json!("January")));
    assert_eq!(projection[1].as_value(), Some(&json!("January")));
    // mythology and history are indexed but not stored.
    assert_eq!(projection[2].as_value(), Some(&serde_json::Value::Null));
}

#[test]
fn hit_sequence_follows_ranking_order() {
    let harness = TestHarness::with_months();

    // Both months mention "month"; January mentions "colder" on top.
    let query = QueryBuilder::bool()
        .should(QueryBuilder::term().on("mythology").matches("month"))
        .should(QueryBuilder::term().on("mythology").matches("colder"))
        .create_query();

    let ids: Vec<_> = harness
        .session
        .search(&query, MONTH)
        .unwrap()
        .map(|info| info.id().clone())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0].as_str(), "jan");
    assert_eq!(ids[1].as_str(), "feb");
}
