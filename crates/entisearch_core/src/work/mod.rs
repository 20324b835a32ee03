//! Pending index work.
//!
//! Index mutations performed inside a transaction are not applied
//! immediately; they are buffered as [`WorkItem`]s in a per-transaction
//! [`WorkQueue`] and applied only when the transaction commits.

mod item;
mod queue;

pub use item::{WorkItem, WorkKind};
pub use queue::WorkQueue;
