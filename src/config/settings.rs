//! Persisted per-field formatter settings.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TRIM_LENGTH;
use crate::core::FormatterError;
use crate::presenter::{FieldType, RenderSettings};
use crate::summary::limit_from_setting;
use crate::token::{TokenTypeMap, ensure_valid_pattern};

/// Settings of the `reference` formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSettings {
    /// Pattern; empty renders the referenced record's label
    pub tokenized_text: String,
    /// Link the text to the referenced record
    pub link: bool,
}

impl Default for ReferenceSettings {
    fn default() -> Self {
        Self {
            tokenized_text: String::new(),
            link: true,
        }
    }
}

/// Settings of the `string` formatter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringSettings {
    /// Pattern; empty renders the raw stored value
    pub tokenized_text: String,
    /// Link the text to the owning record
    pub link_to_entity: bool,
}

/// Settings of the `text` formatter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Pattern; empty renders the raw stored value
    pub tokenized_text: String,
}

/// Settings of the `text_summary` formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSummarySettings {
    /// Pattern; empty renders the raw stored value
    pub tokenized_text: String,
    /// Character limit for derived summaries; zero or negative renders nothing
    pub trim_length: i64,
}

impl Default for TextSummarySettings {
    fn default() -> Self {
        Self {
            tokenized_text: String::new(),
            trim_length: DEFAULT_TRIM_LENGTH,
        }
    }
}

/// Formatter choice and settings for one field.
///
/// Stored as a TOML table tagged by `formatter`; omitted settings take their
/// defaults:
///
/// ```toml
/// [fields.field_tags]
/// formatter = "reference"
/// tokenized_text = "#[term:name]"
///
/// [fields.body]
/// formatter = "text_summary"
/// trim_length = 300
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "formatter", rename_all = "snake_case")]
pub enum FormatterSettings {
    /// Label of referenced records, optionally linked
    Reference(ReferenceSettings),
    /// Plain string value, optionally linked to the owner
    String(StringSettings),
    /// Filtered formatted text
    Text(TextSettings),
    /// Authored or trimmed summary of formatted text
    TextSummary(TextSummarySettings),
}

impl FormatterSettings {
    /// Names of every formatter kind.
    pub const KINDS: [&'static str; 4] = ["reference", "string", "text", "text_summary"];

    /// Default settings for the formatter called `name`.
    pub fn defaults(name: &str) -> Result<Self, FormatterError> {
        match name {
            "reference" => Ok(Self::Reference(ReferenceSettings::default())),
            "string" => Ok(Self::String(StringSettings::default())),
            "text" => Ok(Self::Text(TextSettings::default())),
            "text_summary" => Ok(Self::TextSummary(TextSummarySettings::default())),
            _ => Err(FormatterError::UnknownFormatter {
                name: name.to_string(),
            }),
        }
    }

    /// `reference` settings.
    pub fn reference(pattern: impl Into<String>, link: bool) -> Self {
        Self::Reference(ReferenceSettings {
            tokenized_text: pattern.into(),
            link,
        })
    }

    /// `string` settings.
    pub fn string(pattern: impl Into<String>, link_to_entity: bool) -> Self {
        Self::String(StringSettings {
            tokenized_text: pattern.into(),
            link_to_entity,
        })
    }

    /// `text` settings.
    pub fn text(pattern: impl Into<String>) -> Self {
        Self::Text(TextSettings {
            tokenized_text: pattern.into(),
        })
    }

    /// `text_summary` settings.
    pub fn text_summary(pattern: impl Into<String>, trim_length: i64) -> Self {
        Self::TextSummary(TextSummarySettings {
            tokenized_text: pattern.into(),
            trim_length,
        })
    }

    /// Machine name of the formatter kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Reference(_) => "reference",
            Self::String(_) => "string",
            Self::Text(_) => "text",
            Self::TextSummary(_) => "text_summary",
        }
    }

    /// The configured pattern; empty selects the default representation.
    pub fn pattern(&self) -> &str {
        match self {
            Self::Reference(s) => &s.tokenized_text,
            Self::String(s) => &s.tokenized_text,
            Self::Text(s) => &s.tokenized_text,
            Self::TextSummary(s) => &s.tokenized_text,
        }
    }

    /// Whether this formatter can display fields of `field_type`.
    pub fn applies_to(&self, field_type: &FieldType) -> bool {
        match self {
            Self::Reference(_) => matches!(field_type, FieldType::EntityReference { .. }),
            Self::String(_) => matches!(field_type, FieldType::String | FieldType::StringLong),
            Self::Text(_) | Self::TextSummary(_) => field_type.is_formatted_text(),
        }
    }

    /// Per-call switches for the presenter.
    pub fn render_settings(&self) -> RenderSettings {
        match self {
            Self::Reference(s) => RenderSettings {
                link_enabled: s.link,
                trim_limit: None,
            },
            Self::String(s) => RenderSettings {
                link_enabled: s.link_to_entity,
                trim_limit: None,
            },
            Self::Text(_) => RenderSettings::default(),
            Self::TextSummary(s) => RenderSettings {
                link_enabled: false,
                trim_limit: Some(limit_from_setting(s.trim_length)),
            },
        }
    }

    /// Administrator-facing summary lines.
    ///
    /// `target_label` is the human label of the owning record type, used by
    /// the `string` formatter's link line.
    pub fn summary(&self, target_label: &str) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.pattern().is_empty() {
            lines.push(self.pattern().to_string());
        }

        match self {
            Self::Reference(s) => lines.push(
                if s.link {
                    "Link to the referenced entity"
                } else {
                    "No link"
                }
                .to_string(),
            ),
            Self::String(s) if s.link_to_entity => lines.push(format!("Linked to the {target_label}")),
            Self::TextSummary(s) => lines.push(format!("Trimmed limit: {} characters", s.trim_length)),
            Self::String(_) | Self::Text(_) => {}
        }

        lines
    }

    /// Context names a pattern for this field may use.
    ///
    /// These are the names the presenter binds: the owner's category and
    /// token type, plus those of the target category for reference fields.
    pub fn allowed_contexts(
        field_type: &FieldType,
        owner_category: &str,
        token_types: &TokenTypeMap,
    ) -> Vec<String> {
        let mut contexts = Vec::new();
        let mut add = |category: &str| {
            for name in [category, token_types.token_type(category)] {
                if !contexts.iter().any(|c| c == name) {
                    contexts.push(name.to_string());
                }
            }
        };

        if let Some(target) = field_type.target_category() {
            add(target);
        }
        add(owner_category);
        contexts
    }

    /// Validate the pattern for a field of `field_type` on `owner_category` records.
    ///
    /// # Errors
    ///
    /// [`FormatterError::IncompatibleField`] when the formatter cannot display
    /// the field, or [`FormatterError::InvalidPattern`] for the first problem
    /// found in the pattern.
    pub fn validate(
        &self,
        field_type: &FieldType,
        owner_category: &str,
        token_types: &TokenTypeMap,
    ) -> Result<(), FormatterError> {
        if !self.applies_to(field_type) {
            return Err(FormatterError::IncompatibleField {
                formatter: self.kind_name().to_string(),
                field_type: field_type.machine_name().to_string(),
            });
        }

        let allowed = Self::allowed_contexts(field_type, owner_category, token_types);
        let allowed: Vec<&str> = allowed.iter().map(String::as_str).collect();
        ensure_valid_pattern(self.pattern(), &allowed)
    }
}
