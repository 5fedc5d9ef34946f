//! Records and property resolution.
//!
//! A [`Record`] is anything a field belongs to or references: it has a
//! category (the discriminator used as a placeholder context name), an
//! optional persisted id, a human label, and a tree of properties.
//!
//! Turning a property path into display text is the job of a
//! [`PropertyResolver`]. The token resolver never inspects records itself;
//! hosts inject their own resolver, or use [`RecordPropertyResolver`], which
//! walks [`Record::property`].
//!
//! # Property Paths
//!
//! Paths are the `property` half of a `[context:property]` placeholder.
//! Segments may be chained with `:` or `.`:
//!
//! - `[node:title]` - top-level property
//! - `[node:author:name]` - nested property
//! - `[node:field_tags.0]` - array element

mod json;

pub use json::JsonRecord;

use anyhow::Result;
use serde_json::Value;

/// A record that can own fields, be referenced, and be linked to.
pub trait Record {
    /// Category discriminator (e.g. `node`, `user`, `taxonomy_term`).
    fn category(&self) -> &str;

    /// Persisted identifier, `None` for records that were never saved.
    fn id(&self) -> Option<&str>;

    /// Intrinsic label, the default representation of a referenced record.
    fn label(&self) -> String;

    /// Whether the record is newly created and not yet persisted.
    fn is_new(&self) -> bool {
        self.id().is_none()
    }

    /// Look up a property by its already-split path segments.
    fn property(&self, _path: &[&str]) -> Option<Value> {
        None
    }
}

/// Token-resolution collaborator: turns a property path into text for a record.
///
/// Implementations return `Ok(String::new())` for absent properties. An
/// `Err` is treated by the caller as "no value".
pub trait PropertyResolver {
    /// Resolve `path` against `record`.
    fn resolve(&self, path: &str, record: &dyn Record) -> Result<String>;
}

/// Resolver that reads values through [`Record::property`].
///
/// Single-segment paths `label`, `id` and `category` are answered from the
/// record itself when the record does not define a property of that name.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordPropertyResolver;

impl PropertyResolver for RecordPropertyResolver {
    fn resolve(&self, path: &str, record: &dyn Record) -> Result<String> {
        let segments = split_path(path);
        if segments.is_empty() {
            return Ok(String::new());
        }

        if let Some(value) = record.property(&segments) {
            return Ok(value_to_text(&value));
        }

        let builtin = match segments.as_slice() {
            ["label"] => record.label(),
            ["id"] => record.id().unwrap_or_default().to_string(),
            ["category"] => record.category().to_string(),
            _ => String::new(),
        };
        Ok(builtin)
    }
}

/// Split a property path on `:` and `.`, dropping empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split([':', '.']).map(str::trim).filter(|segment| !segment.is_empty()).collect()
}

/// Render a JSON value as display text.
///
/// Strings are returned verbatim, scalars via their JSON text, arrays as a
/// comma-separated list, and objects through their `label` or `value` key.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => {
            map.get("label").or_else(|| map.get("value")).map(value_to_text).unwrap_or_default()
        }
    }
}
