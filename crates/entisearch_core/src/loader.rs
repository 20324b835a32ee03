//! Query execution and result materialization.

use crate::entity_info::{EntityInfo, Projected};
use crate::error::CoreResult;
use crate::transaction::IdentityScope;
use entisearch_backend::{EntityStore, IndexBackend, IndexHit, IndexQuery, SharedEntity};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Projection field name standing for the entity itself.
///
/// Requesting this field alongside stored fields yields a projection whose
/// slot is back-filled with the fully loaded entity instance.
pub const SELF_FIELD: &str = "__self";

/// One materialized query result.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// The fully loaded entity.
    Entity(SharedEntity),
    /// The projected values, with self positions already populated.
    Projection(Vec<Projected>),
}

impl QueryOutcome {
    /// Returns the entity, if this is a full load.
    #[must_use]
    pub fn as_entity(&self) -> Option<&SharedEntity> {
        match self {
            Self::Entity(e) => Some(e),
            Self::Projection(_) => None,
        }
    }

    /// Returns the projection, if this is a projected result.
    #[must_use]
    pub fn as_projection(&self) -> Option<&[Projected]> {
        match self {
            Self::Projection(p) => Some(p),
            Self::Entity(_) => None,
        }
    }
}

/// Lazy, finite, non-restartable sequence of query hits.
///
/// Yields one [`EntityInfo`] per raw hit, in the index engine's ranking
/// order. Building the descriptors is deferred to iteration; consuming the
/// sequence consumes the underlying hits.
#[derive(Debug)]
pub struct HitSequence {
    hits: std::vec::IntoIter<IndexHit>,
    projected_fields: Option<Vec<String>>,
}

impl HitSequence {
    fn new(hits: Vec<IndexHit>, projected_fields: Option<Vec<String>>) -> Self {
        Self {
            hits: hits.into_iter(),
            projected_fields,
        }
    }

    /// Returns the number of hits not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.hits.len()
    }
}

impl Iterator for HitSequence {
    type Item = EntityInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let hit = self.hits.next()?;
        match &self.projected_fields {
            None => Some(EntityInfo::new(hit.entity_type, hit.id_field, hit.id)),
            Some(fields) => {
                let mut projection = Vec::with_capacity(fields.len());
                let mut self_positions = Vec::new();
                for (position, field) in fields.iter().enumerate() {
                    if field == SELF_FIELD {
                        self_positions.push(position);
                        projection.push(Projected::Value(Value::Null));
                    } else {
                        let value = hit
                            .stored_fields
                            .get(field)
                            .cloned()
                            .unwrap_or(Value::Null);
                        projection.push(Projected::Value(value));
                    }
                }
                // Positions come from the enumeration above, so they are
                // always in bounds.
                EntityInfo::with_projection(
                    hit.entity_type,
                    hit.id_field,
                    hit.id,
                    projection,
                    self_positions,
                )
                .ok()
            }
        }
    }
}

/// Executes compiled queries and resolves hits into results.
///
/// `search` talks only to the index; `load` talks to the identity scope
/// first and the store second, so instances already managed by the current
/// transaction are reused rather than re-loaded.
pub struct Loader {
    store: Arc<dyn EntityStore>,
    index: Arc<dyn IndexBackend>,
}

impl Loader {
    /// Creates a loader over a store and an index.
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>, index: Arc<dyn IndexBackend>) -> Self {
        Self { store, index }
    }

    /// Executes a compiled query, returning descriptors for full loads.
    pub fn search(&self, query: &IndexQuery, entity_type: &str) -> CoreResult<HitSequence> {
        let hits = self.index.search(query, entity_type)?;
        Ok(HitSequence::new(hits, None))
    }

    /// Executes a compiled query, projecting the named fields.
    ///
    /// [`SELF_FIELD`] slots are back-filled with the loaded entity during
    /// [`load`](Self::load); other fields take the hit's stored value, or
    /// null when the document did not store the field.
    pub fn search_projected(
        &self,
        query: &IndexQuery,
        entity_type: &str,
        fields: &[&str],
    ) -> CoreResult<HitSequence> {
        let hits = self.index.search(query, entity_type)?;
        Ok(HitSequence::new(
            hits,
            Some(fields.iter().map(|f| (*f).to_string()).collect()),
        ))
    }

    /// Resolves descriptors into results.
    ///
    /// Each descriptor resolves to the managed instance from the identity
    /// scope when one exists, otherwise to a fresh store load that is then
    /// attached to the scope. Identities that no longer resolve in the
    /// store are skipped - the sequence shrinks, queries over a lagging
    /// index are not an error.
    pub fn load(
        &self,
        scope: &mut IdentityScope,
        infos: impl IntoIterator<Item = EntityInfo>,
    ) -> CoreResult<Vec<QueryOutcome>> {
        let mut outcomes = Vec::new();
        for mut info in infos {
            let managed = scope.find_managed(info.entity_type(), info.id());
            let entity = match managed {
                Some(entity) => entity,
                None => match self.store.load_by_identity(info.entity_type(), info.id())? {
                    Some(entity) => {
                        scope.attach(entity.clone());
                        entity
                    }
                    None => {
                        debug!(
                            entity_type = info.entity_type(),
                            id = %info.id(),
                            "skipping stale index hit"
                        );
                        continue;
                    }
                },
            };

            if info.projection().is_some() {
                info.populate_self(&entity);
                // with_projection guarantees the projection exists here.
                if let Some(projection) = info.into_projection() {
                    outcomes.push(QueryOutcome::Projection(projection));
                }
            } else {
                outcomes.push(QueryOutcome::Entity(entity));
            }
        }
        Ok(outcomes)
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader").finish_non_exhaustive()
    }
}
