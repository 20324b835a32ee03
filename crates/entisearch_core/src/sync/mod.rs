//! Transaction synchronization of index work.
//!
//! The [`IndexSynchronizer`] binds a work queue's lifetime to the enclosing
//! transaction: index mutations buffered during the transaction reach the
//! index engine only if the store transaction commits, and are discarded
//! without a single backend call on rollback.

mod synchronizer;

pub use synchronizer::{IndexSynchronizer, SyncPhase};
