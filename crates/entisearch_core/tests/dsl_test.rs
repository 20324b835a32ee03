//! Query DSL scenarios over the seeded month fixture.

use entisearch_core::QueryBuilder;
use entisearch_testkit::fixtures::{TestHarness, MONTH};

fn result_size(harness: &TestHarness, query: &entisearch_backend::IndexQuery) -> usize {
    harness.session.search(query, MONTH).unwrap().count()
}

#[test]
fn term_query_with_analyzer() {
    let harness = TestHarness::with_months();

    // No month mentions "cold" as a full term.
    let query = QueryBuilder::term().on("mythology").matches("cold").create_query();
    assert_eq!(result_size(&harness, &query), 0);

    // Several words: any analyzed term may match.
    let query = QueryBuilder::term()
        .on("mythology")
        .matches("colder darker")
        .create_query();
    assert_eq!(result_size(&harness, &query), 1);

    // Both months talk about a month.
    let query = QueryBuilder::term().on("mythology").matches("month").create_query();
    assert_eq!(result_size(&harness, &query), 2);
}

#[test]
fn term_query_ignoring_analyzer() {
    let harness = TestHarness::with_months();

    // The index lowercases at analysis time, so the capitalized literal
    // matches nothing.
    let query = QueryBuilder::term()
        .on("mythology")
        .matches("Month")
        .ignore_analyzer()
        .create_query();
    assert_eq!(result_size(&harness, &query), 0);

    // The analyzed form of the same text matches both months.
    let query = QueryBuilder::term().on("mythology").matches("Month").create_query();
    assert_eq!(result_size(&harness, &query), 2);
}

#[test]
fn fuzzy_query_with_threshold_and_prefix() {
    let harness = TestHarness::with_months();

    // "calder" is one edit from "colder".
    let query = QueryBuilder::term()
        .on("mythology")
        .matches("calder")
        .fuzzy()
        .threshold(0.8)
        .unwrap()
        .prefix_length(1)
        .create_query();
    assert_eq!(result_size(&harness, &query), 1);
}

#[test]
fn wildcard_query() {
    let harness = TestHarness::with_months();

    let query = QueryBuilder::term().on("mythology").matches("mon*").wildcard().create_query();
    assert_eq!(result_size(&harness, &query), 2);

    let query = QueryBuilder::term().on("mythology").matches("snow*").wildcard().create_query();
    assert_eq!(result_size(&harness, &query), 1);
}

#[test]
fn boolean_combination() {
    let harness = TestHarness::with_months();

    // January has whitening mythology, February whitening history.
    let query = QueryBuilder::bool()
        .should(QueryBuilder::term().on("mythology").matches("whitening"))
        .should(QueryBuilder::term().on("history").matches("whitening"))
        .create_query();

    let ids: Vec<_> = harness
        .session
        .search(&query, MONTH)
        .unwrap()
        .map(|info| info.id().clone())
        .collect();
    assert_eq!(ids.len(), 2);
}

#[test]
fn boosted_clause_changes_ranking() {
    let harness = TestHarness::with_months();

    // Unboosted, the two months tie on their respective whitening fields;
    // the id tie-break puts February first. Boosting mythology flips it.
    let query = QueryBuilder::bool()
        .should(
            QueryBuilder::term()
                .on("mythology")
                .matches("whitening")
                .boosted_to(30.0)
                .unwrap(),
        )
        .should(QueryBuilder::term().on("history").matches("whitening"))
        .create_query();

    let ids: Vec<_> = harness
        .session
        .search(&query, MONTH)
        .unwrap()
        .map(|info| info.id().clone())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0].as_str(), "jan");

    // And the mirror image: boosting history puts February first.
    let query = QueryBuilder::bool()
        .should(QueryBuilder::term().on("mythology").matches("whitening"))
        .should(
            QueryBuilder::term()
                .on("history")
                .matches("whitening")
                .boosted_to(30.0)
                .unwrap(),
        )
        .create_query();

    let ids: Vec<_> = harness
        .session
        .search(&query, MONTH)
        .unwrap()
        .map(|info| info.id().clone())
        .collect();
    assert_eq!(ids[0].as_str(), "feb");
}

#[test]
fn must_not_excludes_a_month() {
    let harness = TestHarness::with_months();

    let query = QueryBuilder::bool()
        .must(QueryBuilder::term().on("mythology").matches("month"))
        .must_not(QueryBuilder::term().on("mythology").matches("snowboarding"))
        .create_query();

    let ids: Vec<_> = harness
        .session
        .search(&query, MONTH)
        .unwrap()
        .map(|info| info.id().clone())
        .collect();
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0].as_str(), "jan");
}
