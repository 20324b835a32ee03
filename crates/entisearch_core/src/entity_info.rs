//! Descriptor bridging an index hit back to a loadable result.

use crate::error::{CoreError, CoreResult};
use entisearch_backend::{EntityId, SharedEntity};
use serde_json::Value;

/// One slot of a projection.
#[derive(Debug, Clone)]
pub enum Projected {
    /// A stored field value from the index.
    Value(Value),
    /// The fully loaded entity itself, back-filled by
    /// [`EntityInfo::populate_self`].
    Entity(SharedEntity),
}

impl Projected {
    /// Returns the field value, if this slot holds one.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Entity(_) => None,
        }
    }

    /// Returns the entity, if this slot holds one.
    #[must_use]
    pub fn as_entity(&self) -> Option<&SharedEntity> {
        match self {
            Self::Entity(e) => Some(e),
            Self::Value(_) => None,
        }
    }
}

/// Describes the loading of one query hit.
///
/// An `EntityInfo` carries identity rather than a reference: the loader
/// resolves it either to an instance already managed in the transaction's
/// identity scope or to a fresh load from the store. For projected queries
/// it additionally carries the projected values and the positions that must
/// be back-filled with the loaded entity.
///
/// Constructed once per hit at result-building time and discarded after
/// the owning result sequence is consumed.
#[derive(Debug)]
pub struct EntityInfo {
    entity_type: String,
    id: EntityId,
    id_field: String,
    projection: Option<Vec<Projected>>,
    self_positions: Vec<usize>,
}

impl EntityInfo {
    /// Creates a descriptor for a full (non-projected) load.
    pub fn new(
        entity_type: impl Into<String>,
        id_field: impl Into<String>,
        id: EntityId,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            id,
            id_field: id_field.into(),
            projection: None,
            self_positions: Vec::new(),
        }
    }

    /// Creates a descriptor for a projected load.
    ///
    /// `self_positions` lists the indices of `projection` to back-fill with
    /// the loaded entity; every index must be in bounds.
    pub fn with_projection(
        entity_type: impl Into<String>,
        id_field: impl Into<String>,
        id: EntityId,
        projection: Vec<Projected>,
        self_positions: Vec<usize>,
    ) -> CoreResult<Self> {
        if let Some(&out) = self_positions.iter().find(|&&p| p >= projection.len()) {
            return Err(CoreError::invalid_argument(format!(
                "self position {out} out of bounds for projection of length {}",
                projection.len()
            )));
        }
        Ok(Self {
            entity_type: entity_type.into(),
            id,
            id_field: id_field.into(),
            projection: Some(projection),
            self_positions,
        })
    }

    /// Returns the entity kind of the hit.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Returns the identifier of the hit.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Returns the name of the identifying property.
    #[must_use]
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Returns the projected values, `None` for a full load.
    #[must_use]
    pub fn projection(&self) -> Option<&[Projected]> {
        self.projection.as_deref()
    }

    /// Returns true if some projection slot awaits the loaded entity.
    #[must_use]
    pub fn is_projecting_self(&self) -> bool {
        !self.self_positions.is_empty()
    }

    /// Writes the loaded entity into every self position.
    ///
    /// Idempotent: calling again with the same entity leaves the
    /// projection unchanged in content.
    pub fn populate_self(&mut self, entity: &SharedEntity) {
        if let Some(projection) = self.projection.as_mut() {
            for &position in &self.self_positions {
                projection[position] = Projected::Entity(entity.clone());
            }
        }
    }

    /// Consumes the descriptor, returning the projection if one was built.
    #[must_use]
    pub fn into_projection(self) -> Option<Vec<Projected>> {
        self.projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entisearch_backend::{shared, StoredEntity};
    use serde_json::json;

    fn entity() -> SharedEntity {
        shared(StoredEntity::new("month", "jan").with_field("name", "January"))
    }

    #[test]
    fn full_load_has_no_projection() {
        let info = EntityInfo::new("month", "id", EntityId::from("jan"));
        assert!(info.projection().is_none());
        assert!(!info.is_projecting_self());
    }

    #[test]
    fn out_of_bounds_self_position_is_rejected() {
        let result = EntityInfo::with_projection(
            "month",
            "id",
            EntityId::from("jan"),
            vec![Projected::Value(json!("January"))],
            vec![1],
        );
        assert!(matches!(result, Err(CoreError::InvalidArgument { .. })));
    }

    #[test]
    fn plain_projection_has_no_self_requirement() {
        let info = EntityInfo::with_projection(
            "month",
            "id",
            EntityId::from("jan"),
            vec![Projected::Value(json!("January"))],
            vec![],
        )
        .unwrap();
        assert!(!info.is_projecting_self());
        assert_eq!(
            info.projection().unwrap()[0].as_value(),
            Some(&json!("January"))
        );
    }

    #[test]
    fn populate_self_fills_every_position() {
        let mut info = EntityInfo::with_projection(
            "month",
            "id",
            EntityId::from("jan"),
            vec![
                Projected::Value(Value::Null),
                Projected::Value(json!("January")),
                Projected::Value(Value::Null),
            ],
            vec![0, 2],
        )
        .unwrap();
        let e = entity();
        info.populate_self(&e);

        let projection = info.projection().unwrap();
        assert!(projection[0].as_entity().is_some());
        assert_eq!(projection[1].as_value(), Some(&json!("January")));
        assert!(projection[2].as_entity().is_some());
    }

    #[test]
    fn populate_self_is_idempotent() {
        let mut info = EntityInfo::with_projection(
            "month",
            "id",
            EntityId::from("jan"),
            vec![Projected::Value(Value::Null)],
            vec![0],
        )
        .unwrap();
        let e = entity();
        info.populate_self(&e);
        info.populate_self(&e);

        let slot = info.projection().unwrap()[0].as_entity().unwrap();
        assert_eq!(slot.read().field("name"), Some(&json!("January")));
    }
}
