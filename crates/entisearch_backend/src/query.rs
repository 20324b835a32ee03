//! Executable query tree and hit representation.

use crate::entity::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Occurrence kind of a boolean clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occur {
    /// The clause may match; matching raises the score.
    Should,
    /// The clause must match.
    Must,
    /// The clause must not match.
    MustNot,
}

/// One clause of a boolean query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanClause {
    /// How the clause participates in matching.
    pub occur: Occur,
    /// The sub-query.
    pub query: IndexQuery,
}

/// An executable query as the index engine understands it.
///
/// This is the compiled form produced by the query DSL. It is a plain value:
/// comparable, clonable, and serializable, so two independent builds of the
/// same builder chain yield equal trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndexQuery {
    /// Matches terms of a field.
    Term {
        /// Field to match against.
        field: String,
        /// Match text; analyzed into terms when `analyzed` is set,
        /// compared literally against indexed terms otherwise.
        text: String,
        /// Whether the engine's analyzer is applied to `text`.
        analyzed: bool,
        /// Score multiplier.
        boost: f32,
    },
    /// Matches terms within an edit-distance similarity of the text.
    Fuzzy {
        /// Field to match against.
        field: String,
        /// Match text.
        text: String,
        /// Minimum normalized similarity in `0.0..=1.0`.
        similarity: f32,
        /// Number of leading characters that must match literally.
        prefix_length: u32,
        /// Score multiplier.
        boost: f32,
    },
    /// Matches raw indexed terms against a `*`/`?` pattern.
    Wildcard {
        /// Field to match against.
        field: String,
        /// Pattern text; never analyzed.
        pattern: String,
        /// Score multiplier.
        boost: f32,
    },
    /// Combines sub-queries with should/must/must-not occurrence.
    Boolean {
        /// Clauses in the order they were added.
        clauses: Vec<BooleanClause>,
        /// Score multiplier applied to the combined score.
        boost: f32,
    },
}

impl IndexQuery {
    /// Returns the boost of this node.
    #[must_use]
    pub fn boost(&self) -> f32 {
        match self {
            Self::Term { boost, .. }
            | Self::Fuzzy { boost, .. }
            | Self::Wildcard { boost, .. }
            | Self::Boolean { boost, .. } => *boost,
        }
    }
}

/// One raw hit of an index search.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    /// Entity kind of the matched document.
    pub entity_type: String,
    /// Identifier of the matched document.
    pub id: EntityId,
    /// Name of the identifying property, taken from the indexed document.
    pub id_field: String,
    /// Match score; hits are returned score-descending.
    pub score: f32,
    /// Stored field values of the matched document.
    pub stored_fields: BTreeMap<String, Value>,
}
