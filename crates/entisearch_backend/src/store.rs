//! Entity store trait.

use crate::entity::{EntityId, SharedEntity};
use crate::error::BackendResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to one in-flight store transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxToken(u64);

impl TxToken {
    /// Wraps a raw token value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw token value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxToken({})", self.0)
    }
}

/// The transactional entity store, as a black box.
///
/// The engine uses exactly four operations: transaction boundaries and
/// identity-based loads. Everything else about the store (schema mapping,
/// persistence, its own locking) stays behind this trait.
pub trait EntityStore: Send + Sync {
    /// Begins a transaction and returns its token.
    fn begin(&self) -> BackendResult<TxToken>;

    /// Commits the transaction behind the token.
    fn commit(&self, token: TxToken) -> BackendResult<()>;

    /// Rolls back the transaction behind the token.
    fn rollback(&self, token: TxToken) -> BackendResult<()>;

    /// Loads an entity by identity.
    ///
    /// A missing identity is `Ok(None)`, not an error: the index is allowed
    /// to lag behind the store, so queries can surface identities that no
    /// longer resolve.
    fn load_by_identity(
        &self,
        entity_type: &str,
        id: &EntityId,
    ) -> BackendResult<Option<SharedEntity>>;
}
