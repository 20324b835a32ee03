//! In-memory entity store.

use crate::entity::{shared, EntityId, SharedEntity, StoredEntity};
use crate::error::{BackendError, BackendResult};
use crate::store::{EntityStore, TxToken};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    Active,
    Committed,
    RolledBack,
}

/// In-memory entity store.
///
/// Holds entities keyed by `(entity_type, id)` and hands out transaction
/// tokens. The store itself is deliberately simple: entity mutations are
/// applied directly through [`MemoryStore::put`] and [`MemoryStore::remove`],
/// and transactions only track their own lifecycle. That is all the
/// synchronization engine relies on from a real store.
#[derive(Default)]
pub struct MemoryStore {
    entities: RwLock<HashMap<(String, EntityId), SharedEntity>>,
    transactions: Mutex<HashMap<u64, TxState>>,
    next_token: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
            transactions: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(1),
        }
    }

    /// Puts an entity into the store, returning its shared handle.
    pub fn put(&self, entity: StoredEntity) -> SharedEntity {
        let key = (entity.entity_type.clone(), entity.id.clone());
        let handle = shared(entity);
        self.entities.write().insert(key, handle.clone());
        handle
    }

    /// Removes an entity from the store.
    ///
    /// Returns true if the identity was present.
    pub fn remove(&self, entity_type: &str, id: &EntityId) -> bool {
        self.entities
            .write()
            .remove(&(entity_type.to_string(), id.clone()))
            .is_some()
    }

    /// Returns the number of stored entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    /// Returns true if the store holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    fn finish(&self, token: TxToken, terminal: TxState) -> BackendResult<()> {
        let mut transactions = self.transactions.lock();
        match transactions.get_mut(&token.value()) {
            None => Err(BackendError::UnknownTransaction {
                token: token.value(),
            }),
            Some(state @ TxState::Active) => {
                *state = terminal;
                Ok(())
            }
            Some(_) => Err(BackendError::TransactionFinished {
                token: token.value(),
            }),
        }
    }
}

impl EntityStore for MemoryStore {
    fn begin(&self) -> BackendResult<TxToken> {
        let token = TxToken::new(self.next_token.fetch_add(1, Ordering::SeqCst));
        self.transactions.lock().insert(token.value(), TxState::Active);
        Ok(token)
    }

    fn commit(&self, token: TxToken) -> BackendResult<()> {
        self.finish(token, TxState::Committed)
    }

    fn rollback(&self, token: TxToken) -> BackendResult<()> {
        self.finish(token, TxState::RolledBack)
    }

    fn load_by_identity(
        &self,
        entity_type: &str,
        id: &EntityId,
    ) -> BackendResult<Option<SharedEntity>> {
        Ok(self
            .entities
            .read()
            .get(&(entity_type.to_string(), id.clone()))
            .cloned())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entities", &self.len())
            .finish_non_exhaustive()
    }
}
