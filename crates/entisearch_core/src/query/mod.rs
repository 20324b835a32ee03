//! Fluent query construction.
//!
//! The DSL builds a [`QuerySpec`] without touching the index: every builder
//! step consumes its receiver and returns a new immutable value, so a
//! partially built expression can be cloned and reused as a sub-clause of
//! several larger queries without aliasing surprises.
//!
//! [`create_query`](TermQuery::create_query) is the terminal step: it
//! compiles the specification into the executable
//! [`IndexQuery`](entisearch_backend::IndexQuery) tree. Compilation is pure
//! and repeatable; two identical chains compile to equal trees.
//!
//! ```rust
//! use entisearch_core::query::QueryBuilder;
//!
//! let whitening = QueryBuilder::term().on("mythology").matches("whitening");
//! let query = QueryBuilder::bool()
//!     .should(whitening.clone())
//!     .should(
//!         QueryBuilder::term()
//!             .on("history")
//!             .matches("whitening")
//!             .boosted_to(30.0)
//!             .unwrap(),
//!     )
//!     .create_query();
//! ```

mod builder;
mod spec;

pub use builder::{
    BoolQuery, FuzzyQuery, QueryBuilder, TermContext, TermFieldContext, TermQuery, WildcardQuery,
};
pub use spec::QuerySpec;
