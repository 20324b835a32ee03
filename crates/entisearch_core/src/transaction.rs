//! Transaction context, participant hooks, and the identity scope.

use crate::error::CoreResult;
use crate::sync::IndexSynchronizer;
use entisearch_backend::{EntityId, SharedEntity, TxToken};
use std::collections::HashMap;
use std::sync::Arc;

/// A participant in the transaction's lifecycle.
///
/// Participants register with the [`TransactionContext`] and are notified
/// at three points: just before the store commit, after the commit attempt
/// (with its outcome), and after a rollback. There is no implicit global
/// registry; whoever owns the context decides who participates.
pub trait TransactionParticipant: Send + Sync {
    /// Called before the store transaction commits.
    ///
    /// An error here vetoes the commit; the owner rolls back instead.
    fn before_commit(&self) -> CoreResult<()> {
        Ok(())
    }

    /// Called after the store commit attempt; `success` tells whether the
    /// data-store transaction actually committed.
    fn after_commit(&self, success: bool) -> CoreResult<()>;

    /// Called after the store transaction rolled back.
    fn after_rollback(&self);
}

/// Transaction-scoped mapping from identity to managed entity.
///
/// One instance per transaction; loads within the transaction reuse the
/// managed handle instead of hitting the store again, which is also what
/// makes in-flight field changes visible to query results.
#[derive(Debug, Default)]
pub struct IdentityScope {
    managed: HashMap<(String, EntityId), SharedEntity>,
}

impl IdentityScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the managed entity for an identity, if any.
    #[must_use]
    pub fn find_managed(&self, entity_type: &str, id: &EntityId) -> Option<SharedEntity> {
        self.managed
            .get(&(entity_type.to_string(), id.clone()))
            .cloned()
    }

    /// Associates an entity with its identity for the rest of the
    /// transaction. Replaces any previous association.
    pub fn attach(&mut self, entity: SharedEntity) {
        let key = {
            let e = entity.read();
            (e.entity_type.clone(), e.id.clone())
        };
        self.managed.insert(key, entity);
    }

    /// Returns the number of managed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.managed.len()
    }

    /// Returns true if no entity is managed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.managed.is_empty()
    }
}

/// State attached to one in-flight transaction.
///
/// Owns the store's transaction token, the registered participants, the
/// identity scope, and - once index work has been enqueued - the index
/// synchronizer.
pub struct TransactionContext {
    token: TxToken,
    participants: Vec<Arc<dyn TransactionParticipant>>,
    identity: IdentityScope,
    synchronizer: Option<Arc<IndexSynchronizer>>,
}

impl TransactionContext {
    /// Creates a context for a freshly begun store transaction.
    #[must_use]
    pub fn new(token: TxToken) -> Self {
        Self {
            token,
            participants: Vec::new(),
            identity: IdentityScope::new(),
            synchronizer: None,
        }
    }

    /// Returns the store transaction token.
    #[must_use]
    pub fn token(&self) -> TxToken {
        self.token
    }

    /// Registers a lifecycle participant.
    pub fn register(&mut self, participant: Arc<dyn TransactionParticipant>) {
        self.participants.push(participant);
    }

    /// Returns the registered participants.
    #[must_use]
    pub fn participants(&self) -> &[Arc<dyn TransactionParticipant>] {
        &self.participants
    }

    /// Returns the identity scope.
    #[must_use]
    pub fn identity(&self) -> &IdentityScope {
        &self.identity
    }

    /// Returns the identity scope mutably.
    pub fn identity_mut(&mut self) -> &mut IdentityScope {
        &mut self.identity
    }

    /// Returns the index synchronizer, if index work has been enqueued.
    #[must_use]
    pub fn synchronizer(&self) -> Option<&Arc<IndexSynchronizer>> {
        self.synchronizer.as_ref()
    }

    /// Installs the index synchronizer and registers it as a participant.
    ///
    /// Called at most once per transaction, on the first enqueue.
    pub(crate) fn install_synchronizer(&mut self, synchronizer: Arc<IndexSynchronizer>) {
        self.register(synchronizer.clone());
        self.synchronizer = Some(synchronizer);
    }
}

impl std::fmt::Debug for TransactionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionContext")
            .field("token", &self.token)
            .field("participants", &self.participants.len())
            .field("managed", &self.identity.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entisearch_backend::{shared, StoredEntity};

    #[test]
    fn identity_scope_reuses_handles() {
        let mut scope = IdentityScope::new();
        let entity = shared(StoredEntity::new("month", "jan"));
        scope.attach(entity.clone());

        let found = scope
            .find_managed("month", &EntityId::from("jan"))
            .expect("managed entity");
        assert!(Arc::ptr_eq(&found, &entity));
        assert!(scope.find_managed("month", &EntityId::from("feb")).is_none());
    }

    #[test]
    fn attach_replaces_previous_association() {
        let mut scope = IdentityScope::new();
        scope.attach(shared(StoredEntity::new("month", "jan")));
        let newer = shared(StoredEntity::new("month", "jan"));
        scope.attach(newer.clone());

        assert_eq!(scope.len(), 1);
        let found = scope.find_managed("month", &EntityId::from("jan")).unwrap();
        assert!(Arc::ptr_eq(&found, &newer));
    }
}
