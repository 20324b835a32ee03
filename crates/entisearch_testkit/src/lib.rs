//! # EntiSearch Testkit
//!
//! Test utilities for EntiSearch.
//!
//! This crate provides:
//! - Fixtures: a ready-made store/index/session harness and a small
//!   seeded data set used across the integration suites
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use entisearch_testkit::fixtures::TestHarness;
//!
//! let harness = TestHarness::with_months();
//! harness.session.begin().unwrap();
//! // ... run queries against the seeded months
//! harness.session.rollback().unwrap();
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;
