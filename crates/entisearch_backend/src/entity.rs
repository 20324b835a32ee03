//! Entity identity and the shared entity handle.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Identifier of an entity.
///
/// Identifiers are opaque to the engine: they only need to be comparable,
/// hashable, and serializable. Natural keys (`"42"`, `"jan"`) and generated
/// UUIDs both fit; everything is carried in string form.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates a new random (UUID v4) entity ID.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the string form of the ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Canonical state of one entity as the store holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntity {
    /// Entity kind, e.g. `"month"`.
    pub entity_type: String,
    /// Identifier within the kind.
    pub id: EntityId,
    /// Field values.
    pub fields: BTreeMap<String, Value>,
}

impl StoredEntity {
    /// Creates an entity with no fields.
    pub fn new(entity_type: impl Into<String>, id: impl Into<EntityId>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field value, consuming and returning the entity.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns a field value, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// A managed entity handle.
///
/// Entities handed out by a store are shared: the same handle is reused for
/// every load of the same identity within a transaction, so in-flight field
/// changes made through one handle are visible through all of them.
pub type SharedEntity = Arc<RwLock<StoredEntity>>;

/// Wraps a [`StoredEntity`] into the shared handle form.
#[must_use]
pub fn shared(entity: StoredEntity) -> SharedEntity {
    Arc::new(RwLock::new(entity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_are_unique() {
        assert_ne!(EntityId::random(), EntityId::random());
    }

    #[test]
    fn id_from_str_and_u64() {
        assert_eq!(EntityId::from("7"), EntityId::from(7u64));
    }

    #[test]
    fn id_ordering_is_lexicographic() {
        assert!(EntityId::from("a") < EntityId::from("b"));
    }

    #[test]
    fn entity_field_access() {
        let e = StoredEntity::new("month", "jan").with_field("name", "January");
        assert_eq!(e.field("name"), Some(&Value::from("January")));
        assert_eq!(e.field("missing"), None);
    }

    #[test]
    fn shared_handle_shows_mutations() {
        let handle = shared(StoredEntity::new("month", "jan").with_field("name", "January"));
        let clone = Arc::clone(&handle);
        handle
            .write()
            .fields
            .insert("name".into(), Value::from("Janvier"));
        assert_eq!(clone.read().field("name"), Some(&Value::from("Janvier")));
    }
}
