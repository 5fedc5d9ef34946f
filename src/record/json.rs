//! JSON-backed record implementation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Record;

/// A record whose properties live in a JSON object.
///
/// Useful for hosts that already hold record data as JSON, and for fixtures.
///
/// ```rust
/// use serde_json::json;
/// use token_formatters::record::{JsonRecord, Record};
///
/// let article = JsonRecord::new("node", "12")
///     .with_label("Release notes")
///     .with_property("author", json!({"name": "Ada"}));
///
/// assert_eq!(article.category(), "node");
/// assert!(!article.is_new());
/// assert_eq!(article.property(&["author", "name"]), Some(json!("Ada")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRecord {
    /// Category discriminator
    pub category: String,
    /// Persisted id; absent for unsaved records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Intrinsic label
    #[serde(default)]
    pub label: String,
    /// Property tree
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl JsonRecord {
    /// Create a persisted record.
    pub fn new(category: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            id: Some(id.into()),
            label: String::new(),
            properties: Map::new(),
        }
    }

    /// Create a record that has not been saved yet.
    pub fn unsaved(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            id: None,
            label: String::new(),
            properties: Map::new(),
        }
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set a top-level property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }
}

impl Record for JsonRecord {
    fn category(&self) -> &str {
        &self.category
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> String {
        self.label.clone()
    }

    fn property(&self, path: &[&str]) -> Option<Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.properties.get(*first)?;

        for segment in rest {
            current = match current {
                Value::Object(map) => map.get(*segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current.clone())
    }
}
