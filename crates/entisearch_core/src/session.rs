//! Session: one store, one index, one transaction at a time.

use crate::entity_info::EntityInfo;
use crate::error::{CoreError, CoreResult};
use crate::loader::{HitSequence, Loader, QueryOutcome};
use crate::sync::IndexSynchronizer;
use crate::transaction::TransactionContext;
use crate::work::WorkItem;
use entisearch_backend::{Document, EntityId, EntityStore, IndexBackend, IndexQuery, SharedEntity};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Entry point of the engine.
///
/// A session pairs an entity store with an index backend and scopes all
/// index-affecting work to one transaction at a time. Index mutations
/// issued through [`add`](Session::add), [`update`](Session::update), and
/// [`purge`](Session::purge) are buffered and reach the index only when
/// [`commit`](Session::commit) succeeds; [`rollback`](Session::rollback)
/// drops them without any index call.
///
/// Operations run on the caller's thread; blocking happens only inside the
/// store and index backends.
pub struct Session {
    store: Arc<dyn EntityStore>,
    index: Arc<dyn IndexBackend>,
    loader: Loader,
    current: Mutex<Option<TransactionContext>>,
}

impl Session {
    /// Creates a session over a store and an index.
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>, index: Arc<dyn IndexBackend>) -> Self {
        let loader = Loader::new(store.clone(), index.clone());
        Self {
            store,
            index,
            loader,
            current: Mutex::new(None),
        }
    }

    /// Begins a transaction.
    ///
    /// Fails with [`CoreError::IllegalState`] if one is already active.
    pub fn begin(&self) -> CoreResult<()> {
        let mut current = self.current.lock();
        if current.is_some() {
            return Err(CoreError::illegal_state("transaction already active"));
        }
        let token = self.store.begin()?;
        debug!(?token, "transaction begun");
        *current = Some(TransactionContext::new(token));
        Ok(())
    }

    /// Returns true if a transaction is active.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.current.lock().is_some()
    }

    /// Associates an entity with the transaction's identity scope.
    pub fn attach(&self, entity: SharedEntity) -> CoreResult<()> {
        let mut current = self.current.lock();
        let context = active(&mut current)?;
        context.identity_mut().attach(entity);
        Ok(())
    }

    /// Buffers an add: index `document` for a new identity on commit.
    pub fn add(
        &self,
        entity_type: impl Into<String>,
        id: EntityId,
        document: Document,
    ) -> CoreResult<()> {
        self.enqueue(WorkItem::add(entity_type, id, document))
    }

    /// Buffers an update: replace the indexed document on commit.
    pub fn update(
        &self,
        entity_type: impl Into<String>,
        id: EntityId,
        document: Document,
    ) -> CoreResult<()> {
        self.enqueue(WorkItem::update(entity_type, id, document))
    }

    /// Buffers a purge: remove the identity from the index on commit.
    pub fn purge(&self, entity_type: impl Into<String>, id: EntityId) -> CoreResult<()> {
        self.enqueue(WorkItem::delete(entity_type, id))
    }

    fn enqueue(&self, item: WorkItem) -> CoreResult<()> {
        let mut current = self.current.lock();
        let context = active(&mut current)?;
        if context.synchronizer().is_none() {
            // First index-affecting mutation of this transaction: create
            // the queue and enlist it in the lifecycle.
            let synchronizer = Arc::new(IndexSynchronizer::new(self.index.clone()));
            context.install_synchronizer(synchronizer);
        }
        context
            .synchronizer()
            .map(|s| s.enqueue(item))
            .unwrap_or_else(|| Err(CoreError::illegal_state("synchronizer missing")))
    }

    /// Commits the transaction.
    ///
    /// Participants are notified `before_commit`, the store commits, then
    /// participants are notified `after_commit` with the outcome; the index
    /// synchronizer flushes its queue at that point. A
    /// [`CoreError::Synchronization`] from the flush reaches the caller:
    /// the store has committed and the index is known to diverge.
    pub fn commit(&self) -> CoreResult<()> {
        let context = self
            .current
            .lock()
            .take()
            .ok_or_else(|| CoreError::illegal_state("no active transaction"))?;
        let token = context.token();

        for participant in context.participants() {
            if let Err(veto) = participant.before_commit() {
                debug!(?token, "commit vetoed, rolling back");
                let _ = self.store.rollback(token);
                for p in context.participants() {
                    p.after_rollback();
                }
                return Err(veto);
            }
        }

        if let Err(store_failure) = self.store.commit(token) {
            for participant in context.participants() {
                // The flush path is unreachable on failure, so participant
                // errors cannot occur here.
                let _ = participant.after_commit(false);
            }
            return Err(store_failure.into());
        }
        debug!(?token, "transaction committed");

        let mut first_failure = None;
        for participant in context.participants() {
            if let Err(failure) = participant.after_commit(true) {
                first_failure.get_or_insert(failure);
            }
        }
        match first_failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    /// Rolls back the transaction, discarding all pending index work.
    pub fn rollback(&self) -> CoreResult<()> {
        let context = self
            .current
            .lock()
            .take()
            .ok_or_else(|| CoreError::illegal_state("no active transaction"))?;
        let token = context.token();

        let result = self.store.rollback(token);
        for participant in context.participants() {
            participant.after_rollback();
        }
        debug!(?token, "transaction rolled back");
        result.map_err(Into::into)
    }

    /// Executes a compiled query, yielding descriptors for full loads.
    pub fn search(&self, query: &IndexQuery, entity_type: &str) -> CoreResult<HitSequence> {
        self.loader.search(query, entity_type)
    }

    /// Executes a compiled query, projecting the named fields.
    pub fn search_projected(
        &self,
        query: &IndexQuery,
        entity_type: &str,
        fields: &[&str],
    ) -> CoreResult<HitSequence> {
        self.loader.search_projected(query, entity_type, fields)
    }

    /// Resolves descriptors against the transaction's identity scope and
    /// the store. Requires an active transaction.
    pub fn load(
        &self,
        infos: impl IntoIterator<Item = EntityInfo>,
    ) -> CoreResult<Vec<QueryOutcome>> {
        let mut current = self.current.lock();
        let context = active(&mut current)?;
        self.loader.load(context.identity_mut(), infos)
    }
}

fn active(current: &mut Option<TransactionContext>) -> CoreResult<&mut TransactionContext> {
    current
        .as_mut()
        .ok_or_else(|| CoreError::illegal_state("no active transaction"))
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("in_transaction", &self.in_transaction())
            .finish_non_exhaustive()
    }
}
