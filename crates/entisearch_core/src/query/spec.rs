//! Structured query specifications.

use entisearch_backend::{BooleanClause, IndexQuery, Occur};

/// A built query specification, ready to compile.
///
/// This is the tagged form every finished builder node converts into. It is
/// a plain immutable value; compiling it never mutates it, so it can be
/// compiled repeatedly or embedded as a sub-clause of other specifications.
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySpec {
    /// A term match on one field.
    Term {
        /// Field to match against.
        field: String,
        /// Match text.
        text: String,
        /// Whether the index engine's analyzer is applied to the text.
        analyzed: bool,
        /// Score multiplier.
        boost: f32,
    },
    /// A fuzzy match wrapping a term.
    Fuzzy {
        /// Field to match against.
        field: String,
        /// Match text.
        text: String,
        /// Minimum similarity in `0.0..=1.0`.
        similarity: f32,
        /// Leading characters preserved literally.
        prefix_length: u32,
        /// Score multiplier.
        boost: f32,
    },
    /// A wildcard match; the analyzer is always off.
    Wildcard {
        /// Field to match against.
        field: String,
        /// Pattern containing `*`/`?` wildcards.
        pattern: String,
        /// Score multiplier.
        boost: f32,
    },
    /// A boolean combination of sub-specifications.
    Boolean {
        /// Clauses in the order they were added.
        clauses: Vec<(Occur, QuerySpec)>,
        /// Score multiplier for the combination.
        boost: f32,
    },
}

impl QuerySpec {
    /// Compiles this specification into an executable index query.
    ///
    /// Pure: callable any number of times, always yielding an equal tree.
    #[must_use]
    pub fn compile(&self) -> IndexQuery {
        match self {
            Self::Term {
                field,
                text,
                analyzed,
                boost,
            } => IndexQuery::Term {
                field: field.clone(),
                text: text.clone(),
                analyzed: *analyzed,
                boost: *boost,
            },
            Self::Fuzzy {
                field,
                text,
                similarity,
                prefix_length,
                boost,
            } => IndexQuery::Fuzzy {
                field: field.clone(),
                text: text.clone(),
                similarity: *similarity,
                prefix_length: *prefix_length,
                boost: *boost,
            },
            Self::Wildcard {
                field,
                pattern,
                boost,
            } => IndexQuery::Wildcard {
                field: field.clone(),
                pattern: pattern.clone(),
                boost: *boost,
            },
            Self::Boolean { clauses, boost } => IndexQuery::Boolean {
                clauses: clauses
                    .iter()
                    .map(|(occur, spec)| BooleanClause {
                        occur: *occur,
                        query: spec.compile(),
                    })
                    .collect(),
                boost: *boost,
            },
        }
    }
}
