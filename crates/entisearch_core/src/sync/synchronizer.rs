//! The per-transaction index synchronizer.

use crate::error::{CoreError, CoreResult};
use crate::transaction::TransactionParticipant;
use crate::work::{WorkItem, WorkQueue};
use entisearch_backend::IndexBackend;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Lifecycle phase of a synchronizer.
///
/// The queue-less initial state is represented by the synchronizer not
/// existing yet: it is created lazily on the first enqueue, already
/// `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Work is being buffered; the transaction has not resolved.
    Pending,
    /// The store committed; drained items are being applied.
    Flushing,
    /// All items reached the index. Terminal.
    Committed,
    /// The queue was dropped without touching the index. Terminal.
    Discarded,
}

struct SyncState {
    phase: SyncPhase,
    queue: WorkQueue,
}

/// Applies a transaction's pending index work at the commit boundary.
///
/// Registered as a [`TransactionParticipant`]; flushes the queue in
/// `after_commit(true)`, discards it in `after_commit(false)` and
/// `after_rollback`. A backend rejection during the flush is surfaced as
/// [`CoreError::Synchronization`]: at that point the store has already
/// committed and the drained queue is consumed, so the divergence must
/// reach the caller rather than be swallowed or retried.
pub struct IndexSynchronizer {
    index: Arc<dyn IndexBackend>,
    state: Mutex<SyncState>,
}

impl IndexSynchronizer {
    /// Creates a synchronizer with an empty pending queue.
    #[must_use]
    pub fn new(index: Arc<dyn IndexBackend>) -> Self {
        Self {
            index,
            state: Mutex::new(SyncState {
                phase: SyncPhase::Pending,
                queue: WorkQueue::new(),
            }),
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.state.lock().phase
    }

    /// Buffers one work item.
    ///
    /// Fails with [`CoreError::IllegalState`] once flushing has begun or a
    /// terminal phase was reached.
    pub fn enqueue(&self, item: WorkItem) -> CoreResult<()> {
        let mut state = self.state.lock();
        if state.phase != SyncPhase::Pending {
            return Err(CoreError::illegal_state(format!(
                "cannot enqueue index work in phase {:?}",
                state.phase
            )));
        }
        state.queue.enqueue(item);
        Ok(())
    }

    /// Returns true if no effective work is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }

    fn flush(&self) -> CoreResult<()> {
        let items = {
            let mut state = self.state.lock();
            if state.phase != SyncPhase::Pending {
                return Err(CoreError::illegal_state(format!(
                    "cannot flush in phase {:?}",
                    state.phase
                )));
            }
            state.phase = SyncPhase::Flushing;
            state.queue.drain_in_order()
        };

        debug!(items = items.len(), "flushing index work queue");
        let mut applied = 0usize;
        for item in items {
            let entity_type = item.entity_type().to_string();
            let id = item.id().clone();
            if let Err(source) = self.index.apply(&item.into_operation()) {
                // The store commit already happened; mark terminal and
                // surface the divergence.
                self.state.lock().phase = SyncPhase::Discarded;
                return Err(CoreError::Synchronization {
                    applied,
                    entity_type,
                    id,
                    source,
                });
            }
            applied += 1;
        }
        self.state.lock().phase = SyncPhase::Committed;
        debug!(applied, "index work queue flushed");
        Ok(())
    }

    fn discard(&self) {
        let mut state = self.state.lock();
        if matches!(state.phase, SyncPhase::Committed | SyncPhase::Discarded) {
            return;
        }
        let dropped = state.queue.len();
        state.queue.drain_in_order();
        state.phase = SyncPhase::Discarded;
        debug!(dropped, "index work queue discarded");
    }
}

impl TransactionParticipant for IndexSynchronizer {
    fn after_commit(&self, success: bool) -> CoreResult<()> {
        if success {
            self.flush()
        } else {
            self.discard();
            Ok(())
        }
    }

    fn after_rollback(&self) {
        self.discard();
    }
}

impl std::fmt::Debug for IndexSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("IndexSynchronizer")
            .field("phase", &state.phase)
            .field("pending", &state.queue.len())
            .finish_non_exhaustive()
    }
}
