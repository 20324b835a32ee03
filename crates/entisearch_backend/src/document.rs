//! Index document representation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One field of an index document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    /// The text handed to the index engine's analyzer.
    pub text: String,
    /// The original value, kept in the index for projections.
    /// `None` for index-only fields.
    pub stored: Option<Value>,
}

/// Serialized index representation of one entity.
///
/// A document is what the engine hands to the index backend for add and
/// update operations. It carries the text to analyze per field, the values
/// stored for projection, and the name of the identifying property so that
/// hits can be reattached to the store later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Name of the identifying property, `"id"` unless overridden.
    pub id_field: String,
    /// Fields by name, in stable order.
    pub fields: BTreeMap<String, FieldValue>,
}

impl Document {
    /// Creates an empty document with the default `"id"` identifier field.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id_field: "id".to_string(),
            fields: BTreeMap::new(),
        }
    }

    /// Overrides the name of the identifying property.
    #[must_use]
    pub fn with_id_field(mut self, name: impl Into<String>) -> Self {
        self.id_field = name.into();
        self
    }

    /// Adds an index-only field: analyzed and searchable, not stored.
    #[must_use]
    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.fields.insert(
            name.into(),
            FieldValue {
                text: text.into(),
                stored: None,
            },
        );
        self
    }

    /// Adds a stored field: searchable and retrievable in projections.
    #[must_use]
    pub fn with_stored(
        mut self,
        name: impl Into<String>,
        text: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.fields.insert(
            name.into(),
            FieldValue {
                text: text.into(),
                stored: Some(value.into()),
            },
        );
        self
    }

    /// Returns a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns the stored values of this document.
    #[must_use]
    pub fn stored_fields(&self) -> BTreeMap<String, Value> {
        self.fields
            .iter()
            .filter_map(|(name, fv)| fv.stored.clone().map(|v| (name.clone(), v)))
            .collect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_fields_are_not_stored() {
        let doc = Document::new().with_text("body", "some words");
        assert!(doc.field("body").unwrap().stored.is_none());
        assert!(doc.stored_fields().is_empty());
    }

    #[test]
    fn stored_fields_keep_values() {
        let doc = Document::new().with_stored("name", "January", json!("January"));
        assert_eq!(doc.stored_fields().get("name"), Some(&json!("January")));
    }

    #[test]
    fn id_field_defaults_and_overrides() {
        assert_eq!(Document::new().id_field, "id");
        assert_eq!(Document::new().with_id_field("key").id_field, "key");
    }
}
