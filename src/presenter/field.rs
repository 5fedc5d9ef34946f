//! Field input types: field types, items and their raw values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::record::Record;

/// Storage type of a field, which decides the formatters that may display it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    /// Single-line plain text
    String,
    /// Multi-line plain text
    StringLong,
    /// Formatted text
    Text,
    /// Long formatted text
    TextLong,
    /// Long formatted text with an optional authored summary
    TextWithSummary,
    /// Reference to records of another category
    EntityReference {
        /// Category of the referenced records
        target_category: String,
    },
}

impl FieldType {
    /// Machine name used in settings and error messages.
    pub fn machine_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::StringLong => "string_long",
            FieldType::Text => "text",
            FieldType::TextLong => "text_long",
            FieldType::TextWithSummary => "text_with_summary",
            FieldType::EntityReference {
                ..
            } => "entity_reference",
        }
    }

    /// Plain string fields, which may link to their owning record.
    pub fn supports_self_link(&self) -> bool {
        matches!(self, FieldType::String | FieldType::StringLong)
    }

    /// Formatted text fields.
    pub fn is_formatted_text(&self) -> bool {
        matches!(self, FieldType::Text | FieldType::TextLong | FieldType::TextWithSummary)
    }

    /// Category of referenced records, for reference fields.
    pub fn target_category(&self) -> Option<&str> {
        match self {
            FieldType::EntityReference {
                target_category,
            } => Some(target_category),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.machine_name())
    }
}

/// Raw stored value of one field item.
#[derive(Clone)]
pub enum ItemValue<'a> {
    /// A plain scalar value
    Scalar(String),
    /// Formatted text with its format and optional authored summary
    Text {
        /// Full stored value
        value: String,
        /// Authored summary, if any
        summary: Option<String>,
        /// Text format id; `None` uses the fallback format
        format: Option<String>,
    },
    /// A referenced record
    Reference(&'a dyn Record),
}

impl fmt::Debug for ItemValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemValue::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            ItemValue::Text {
                value,
                summary,
                format,
            } => f
                .debug_struct("Text")
                .field("value", value)
                .field("summary", summary)
                .field("format", format)
                .finish(),
            ItemValue::Reference(record) => f
                .debug_struct("Reference")
                .field("category", &record.category())
                .field("id", &record.id())
                .finish(),
        }
    }
}

/// One value of a multi-value field.
#[derive(Debug, Clone)]
pub struct FieldItem<'a> {
    /// Zero-based position within the field
    pub delta: usize,
    /// Raw stored value
    pub value: ItemValue<'a>,
    /// Link attributes stored with the item (reference fields)
    pub attributes: BTreeMap<String, String>,
}

impl<'a> FieldItem<'a> {
    fn with_value(delta: usize, value: ItemValue<'a>) -> Self {
        Self {
            delta,
            value,
            attributes: BTreeMap::new(),
        }
    }

    /// A plain scalar item.
    pub fn scalar(delta: usize, value: impl Into<String>) -> Self {
        Self::with_value(delta, ItemValue::Scalar(value.into()))
    }

    /// A formatted text item without a summary.
    pub fn text(delta: usize, value: impl Into<String>, format: Option<&str>) -> Self {
        Self::with_value(
            delta,
            ItemValue::Text {
                value: value.into(),
                summary: None,
                format: format.map(str::to_string),
            },
        )
    }

    /// A reference to another record.
    pub fn reference(delta: usize, record: &'a dyn Record) -> Self {
        Self::with_value(delta, ItemValue::Reference(record))
    }

    /// Attach an authored summary; ignored for non-text items.
    #[must_use]
    pub fn with_summary(mut self, authored: impl Into<String>) -> Self {
        if let ItemValue::Text {
            summary,
            ..
        } = &mut self.value
        {
            *summary = Some(authored.into());
        }
        self
    }

    /// Add a stored link attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// A field of the owning record: its name, type and ordered items.
#[derive(Debug, Clone)]
pub struct Field<'a> {
    /// Field machine name
    pub name: String,
    /// Storage type
    pub field_type: FieldType,
    /// Items in delta order
    pub items: Vec<FieldItem<'a>>,
}

impl<'a> Field<'a> {
    /// Create an empty field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            items: Vec::new(),
        }
    }

    /// Append an item.
    #[must_use]
    pub fn with_item(mut self, item: FieldItem<'a>) -> Self {
        self.items.push(item);
        self
    }
}
