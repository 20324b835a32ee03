//! In-memory index backend.
//!
//! `MemoryIndex` is the reference [`IndexBackend`]: an inverted index held
//! entirely in memory, with a whitespace/punctuation lowercasing analyzer,
//! term, fuzzy, wildcard, and boolean queries, and multiplicative boost
//! scoring. It backs the test suites and is usable as an embedded engine
//! for small data sets.

use crate::document::Document;
use crate::entity::EntityId;
use crate::error::BackendResult;
use crate::index::{IndexBackend, IndexOperation};
use crate::query::{IndexHit, IndexQuery, Occur};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Splits text into lowercased tokens on whitespace and punctuation.
fn analyze(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_whitespace() || c.is_ascii_punctuation() {
            if !current.is_empty() {
                tokens.push(current.to_lowercase());
                current.clear();
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current.to_lowercase());
    }
    tokens
}

/// Levenshtein edit distance between two terms.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }
    prev[b.len()]
}

/// Normalized similarity in `0.0..=1.0`; `1.0` means equal terms.
fn similarity(a: &str, b: &str) -> f32 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f32 / longest as f32
}

/// Matches a term against a `*`/`?` glob pattern.
fn glob_match(pattern: &[char], term: &[char]) -> bool {
    match pattern.split_first() {
        None => term.is_empty(),
        Some(('*', rest)) => {
            (0..=term.len()).any(|skip| glob_match(rest, &term[skip..]))
        }
        Some(('?', rest)) => match term.split_first() {
            Some((_, term_rest)) => glob_match(rest, term_rest),
            None => false,
        },
        Some((literal, rest)) => match term.split_first() {
            Some((c, term_rest)) => c == literal && glob_match(rest, term_rest),
            None => false,
        },
    }
}

/// One indexed document: analyzed terms per field plus stored values.
#[derive(Debug, Clone)]
struct IndexedDocument {
    id_field: String,
    terms: HashMap<String, Vec<String>>,
    stored: BTreeMap<String, Value>,
}

impl IndexedDocument {
    fn from_document(document: &Document) -> Self {
        let terms = document
            .fields
            .iter()
            .map(|(name, fv)| (name.clone(), analyze(&fv.text)))
            .collect();
        Self {
            id_field: document.id_field.clone(),
            terms,
            stored: document.stored_fields(),
        }
    }

    fn field_terms(&self, field: &str) -> &[String] {
        self.terms.get(field).map_or(&[], Vec::as_slice)
    }
}

/// Scores a query against one document. `None` means no match.
fn score(query: &IndexQuery, doc: &IndexedDocument) -> Option<f32> {
    match query {
        IndexQuery::Term {
            field,
            text,
            analyzed,
            boost,
        } => {
            let doc_terms = doc.field_terms(field);
            let matched = if *analyzed {
                // Analyzed text produces one or more terms, any of which
                // may match.
                analyze(text)
                    .iter()
                    .filter(|t| doc_terms.iter().any(|d| d == *t))
                    .count()
            } else {
                // Literal comparison against indexed terms.
                usize::from(doc_terms.iter().any(|d| d == text))
            };
            (matched > 0).then(|| boost * matched as f32)
        }
        IndexQuery::Fuzzy {
            field,
            text,
            similarity: threshold,
            prefix_length,
            boost,
        } => {
            let prefix: String = text.chars().take(*prefix_length as usize).collect();
            let needle = text.to_lowercase();
            let best = doc
                .field_terms(field)
                .iter()
                .filter(|term| term.starts_with(&prefix.to_lowercase()))
                .map(|term| similarity(&needle, term))
                .filter(|sim| sim >= threshold)
                .fold(None::<f32>, |best, sim| {
                    Some(best.map_or(sim, |b| b.max(sim)))
                });
            best.map(|sim| boost * sim)
        }
        IndexQuery::Wildcard {
            field,
            pattern,
            boost,
        } => {
            let pattern: Vec<char> = pattern.chars().collect();
            let matched = doc
                .field_terms(field)
                .iter()
                .filter(|term| glob_match(&pattern, &term.chars().collect::<Vec<_>>()))
                .count();
            (matched > 0).then(|| boost * matched as f32)
        }
        IndexQuery::Boolean { clauses, boost } => {
            let mut total = 0.0f32;
            let mut any_positive_matched = false;
            let mut has_positive = false;
            for clause in clauses {
                let clause_score = score(&clause.query, doc);
                match clause.occur {
                    Occur::MustNot => {
                        if clause_score.is_some() {
                            return None;
                        }
                    }
                    Occur::Must => {
                        has_positive = true;
                        match clause_score {
                            Some(s) => {
                                total += s;
                                any_positive_matched = true;
                            }
                            None => return None,
                        }
                    }
                    Occur::Should => {
                        has_positive = true;
                        if let Some(s) = clause_score {
                            total += s;
                            any_positive_matched = true;
                        }
                    }
                }
            }
            if has_positive && !any_positive_matched {
                return None;
            }
            Some(total * boost)
        }
    }
}

/// In-memory inverted index.
///
/// Documents are kept per entity type, ordered by identifier; that id order
/// is the engine's internal tie-break for equal scores.
#[derive(Default)]
pub struct MemoryIndex {
    documents: RwLock<HashMap<String, BTreeMap<EntityId, IndexedDocument>>>,
}

impl MemoryIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of indexed documents for an entity type.
    #[must_use]
    pub fn document_count(&self, entity_type: &str) -> usize {
        self.documents
            .read()
            .get(entity_type)
            .map_or(0, BTreeMap::len)
    }
}

impl IndexBackend for MemoryIndex {
    fn apply(&self, operation: &IndexOperation) -> BackendResult<()> {
        let mut documents = self.documents.write();
        match operation {
            IndexOperation::Add {
                entity_type,
                id,
                document,
            }
            | IndexOperation::Update {
                entity_type,
                id,
                document,
            } => {
                documents
                    .entry(entity_type.clone())
                    .or_default()
                    .insert(id.clone(), IndexedDocument::from_document(document));
            }
            IndexOperation::Delete { entity_type, id } => {
                if let Some(per_type) = documents.get_mut(entity_type) {
                    per_type.remove(id);
                }
            }
        }
        Ok(())
    }

    fn search(&self, query: &IndexQuery, entity_type: &str) -> BackendResult<Vec<IndexHit>> {
        let documents = self.documents.read();
        let Some(per_type) = documents.get(entity_type) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<IndexHit> = per_type
            .iter()
            .filter_map(|(id, doc)| {
                score(query, doc).map(|s| IndexHit {
                    entity_type: entity_type.to_string(),
                    id: id.clone(),
                    id_field: doc.id_field.clone(),
                    score: s,
                    stored_fields: doc.stored.clone(),
                })
            })
            .collect();
        // Stable sort keeps the id-order tie-break.
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        Ok(hits)
    }
}

impl std::fmt::Debug for MemoryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let documents = self.documents.read();
        f.debug_struct("MemoryIndex")
            .field("entity_types", &documents.len())
            .finish_non_exhaustive()
    }
}
