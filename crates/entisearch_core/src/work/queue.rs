//! Per-transaction buffer of pending index mutations.

use crate::work::item::{WorkItem, WorkKind};
use entisearch_backend::EntityId;
use std::collections::HashMap;

/// Ordered, coalescing buffer of pending index work.
///
/// The queue keeps at most one effective item per `(entity_type, id)` key:
///
/// - a later operation on a key supersedes the earlier pending one;
/// - an update arriving after a pending add stays an add carrying the
///   newer document, since the entity is still new to the index;
/// - a delete arriving after a pending add cancels both - nothing about
///   that identity reaches the index;
/// - a key re-added after such a cancellation takes a fresh position at
///   the tail.
///
/// Distinct keys drain in first-insertion order. One queue belongs to
/// exactly one in-flight transaction and is not safe for concurrent
/// mutation.
#[derive(Debug, Default)]
pub struct WorkQueue {
    /// Arrival-ordered slots; a cancelled slot stays as `None`.
    slots: Vec<Option<WorkItem>>,
    /// Live keys to their slot.
    index: HashMap<(String, EntityId), usize>,
}

impl WorkQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers one mutation, coalescing against pending work on the
    /// same key.
    pub fn enqueue(&mut self, item: WorkItem) {
        let key = item.key();
        match self.index.get(&key).copied() {
            Some(slot) => {
                let pending = self.slots[slot]
                    .take()
                    .map(|it| it.kind());
                match (pending, item.kind()) {
                    (Some(WorkKind::Add), WorkKind::Delete) => {
                        // The add never became visible; the pair cancels.
                        self.index.remove(&key);
                    }
                    (Some(WorkKind::Add), WorkKind::Update) => {
                        self.slots[slot] = Some(item.with_kind(WorkKind::Add));
                    }
                    _ => {
                        self.slots[slot] = Some(item);
                    }
                }
            }
            None => {
                self.slots.push(Some(item));
                self.index.insert(key, self.slots.len() - 1);
            }
        }
    }

    /// Returns the ordered final items and empties the queue.
    pub fn drain_in_order(&mut self) -> Vec<WorkItem> {
        self.index.clear();
        std::mem::take(&mut self.slots).into_iter().flatten().collect()
    }

    /// Returns true if no effective work is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the number of effective pending items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }
}
