//! Fluent builder contexts.

use crate::error::{CoreError, CoreResult};
use crate::query::spec::QuerySpec;
use entisearch_backend::{IndexQuery, Occur};

const DEFAULT_BOOST: f32 = 1.0;
const DEFAULT_FUZZY_SIMILARITY: f32 = 0.5;

fn check_boost(factor: f32) -> CoreResult<f32> {
    if factor > 0.0 && factor.is_finite() {
        Ok(factor)
    } else {
        Err(CoreError::invalid_argument(format!(
            "boost must be a positive finite number, got {factor}"
        )))
    }
}

/// Entry point of the DSL.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder;

impl QueryBuilder {
    /// Starts a term query.
    #[must_use]
    pub fn term() -> TermContext {
        TermContext { _private: () }
    }

    /// Starts a boolean combination.
    #[must_use]
    pub fn bool() -> BoolQuery {
        BoolQuery {
            clauses: Vec::new(),
            boost: DEFAULT_BOOST,
        }
    }
}

/// Term query awaiting its field.
#[derive(Debug, Clone, Copy)]
pub struct TermContext {
    _private: (),
}

impl TermContext {
    /// Selects the field to match against.
    #[must_use]
    pub fn on(self, field: impl Into<String>) -> TermFieldContext {
        TermFieldContext {
            field: field.into(),
        }
    }
}

/// Term query awaiting its match text.
#[derive(Debug, Clone)]
pub struct TermFieldContext {
    field: String,
}

impl TermFieldContext {
    /// Sets the text to match. The analyzer is applied by default.
    #[must_use]
    pub fn matches(self, text: impl Into<String>) -> TermQuery {
        TermQuery {
            field: self.field,
            text: text.into(),
            analyzed: true,
            boost: DEFAULT_BOOST,
        }
    }
}

/// A built term node.
#[derive(Debug, Clone)]
pub struct TermQuery {
    field: String,
    text: String,
    analyzed: bool,
    boost: f32,
}

impl TermQuery {
    /// Disables analysis: matching becomes a literal comparison against
    /// indexed terms.
    #[must_use]
    pub fn ignore_analyzer(mut self) -> Self {
        self.analyzed = false;
        self
    }

    /// Converts this term into a fuzzy match.
    #[must_use]
    pub fn fuzzy(self) -> FuzzyQuery {
        FuzzyQuery {
            field: self.field,
            text: self.text,
            similarity: DEFAULT_FUZZY_SIMILARITY,
            prefix_length: 0,
            boost: self.boost,
        }
    }

    /// Converts this term into a wildcard match.
    ///
    /// Wildcard patterns match raw index terms, so the analyzer flag is
    /// forced off regardless of any earlier setting.
    #[must_use]
    pub fn wildcard(self) -> WildcardQuery {
        WildcardQuery {
            field: self.field,
            pattern: self.text,
            boost: self.boost,
        }
    }

    /// Sets the score multiplier; the factor must be positive.
    pub fn boosted_to(mut self, factor: f32) -> CoreResult<Self> {
        self.boost = check_boost(factor)?;
        Ok(self)
    }

    /// Compiles into an executable index query.
    #[must_use]
    pub fn create_query(&self) -> IndexQuery {
        QuerySpec::from(self.clone()).compile()
    }
}

impl From<TermQuery> for QuerySpec {
    fn from(q: TermQuery) -> Self {
        Self::Term {
            field: q.field,
            text: q.text,
            analyzed: q.analyzed,
            boost: q.boost,
        }
    }
}

/// A built fuzzy node.
#[derive(Debug, Clone)]
pub struct FuzzyQuery {
    field: String,
    text: String,
    similarity: f32,
    prefix_length: u32,
    boost: f32,
}

impl FuzzyQuery {
    /// Sets the minimum similarity; must be within `0.0..=1.0`.
    pub fn threshold(mut self, similarity: f32) -> CoreResult<Self> {
        if !(0.0..=1.0).contains(&similarity) {
            return Err(CoreError::invalid_argument(format!(
                "fuzzy threshold must be within 0.0..=1.0, got {similarity}"
            )));
        }
        self.similarity = similarity;
        Ok(self)
    }

    /// Sets the number of leading characters preserved literally.
    #[must_use]
    pub fn prefix_length(mut self, length: u32) -> Self {
        self.prefix_length = length;
        self
    }

    /// Sets the score multiplier; the factor must be positive.
    pub fn boosted_to(mut self, factor: f32) -> CoreResult<Self> {
        self.boost = check_boost(factor)?;
        Ok(self)
    }

    /// Compiles into an executable index query.
    #[must_use]
    pub fn create_query(&self) -> IndexQuery {
        QuerySpec::from(self.clone()).compile()
    }
}

impl From<FuzzyQuery> for QuerySpec {
    fn from(q: FuzzyQuery) -> Self {
        Self::Fuzzy {
            field: q.field,
            text: q.text,
            similarity: q.similarity,
            prefix_length: q.prefix_length,
            boost: q.boost,
        }
    }
}

/// A built wildcard node.
#[derive(Debug, Clone)]
pub struct WildcardQuery {
    field: String,
    pattern: String,
    boost: f32,
}

impl WildcardQuery {
    /// Sets the score multiplier; the factor must be positive.
    pub fn boosted_to(mut self, factor: f32) -> CoreResult<Self> {
        self.boost = check_boost(factor)?;
        Ok(self)
    }

    /// Compiles into an executable index query.
    #[must_use]
    pub fn create_query(&self) -> IndexQuery {
        QuerySpec::from(self.clone()).compile()
    }
}

impl From<WildcardQuery> for QuerySpec {
    fn from(q: WildcardQuery) -> Self {
        Self::Wildcard {
            field: q.field,
            pattern: q.pattern,
            boost: q.boost,
        }
    }
}

/// A boolean combination under construction.
#[derive(Debug, Clone)]
pub struct BoolQuery {
    clauses: Vec<(Occur, QuerySpec)>,
    boost: f32,
}

impl BoolQuery {
    fn with_clause(mut self, occur: Occur, spec: impl Into<QuerySpec>) -> Self {
        self.clauses.push((occur, spec.into()));
        self
    }

    /// Appends an optional clause; matching it raises the score.
    #[must_use]
    pub fn should(self, spec: impl Into<QuerySpec>) -> Self {
        self.with_clause(Occur::Should, spec)
    }

    /// Appends a required clause.
    #[must_use]
    pub fn must(self, spec: impl Into<QuerySpec>) -> Self {
        self.with_clause(Occur::Must, spec)
    }

    /// Appends a prohibiting clause.
    #[must_use]
    pub fn must_not(self, spec: impl Into<QuerySpec>) -> Self {
        self.with_clause(Occur::MustNot, spec)
    }

    /// Sets the score multiplier; the factor must be positive.
    pub fn boosted_to(mut self, factor: f32) -> CoreResult<Self> {
        self.boost = check_boost(factor)?;
        Ok(self)
    }

    /// Compiles into an executable index query.
    #[must_use]
    pub fn create_query(&self) -> IndexQuery {
        QuerySpec::from(self.clone()).compile()
    }
}

impl From<BoolQuery> for QuerySpec {
    fn from(q: BoolQuery) -> Self {
        Self::Boolean {
            clauses: q.clauses,
            boost: q.boost,
        }
    }
}
