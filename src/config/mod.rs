//! Display configuration for token formatters
//!
//! Formatter choices are persisted configuration supplied by the host. A
//! single TOML file describes how every field is displayed, which token-type
//! aliases apply when binding records, and how link targets are built.
//!
//! # Modules
//!
//! - `parser` - Generic TOML parsing with file path context
//! - `settings` - Per-field formatter settings and their defaults
//!
//! # File Format
//!
//! ```toml
//! [token_types]
//! taxonomy_term = "term"
//!
//! [link_templates.node]
//! canonical = "/node/{id}"
//! revision = "/node/{id}/latest"
//!
//! [link_templates.taxonomy_term]
//! canonical = "/taxonomy/term/{id}"
//!
//! [fields.field_tags]
//! formatter = "reference"
//! tokenized_text = "#[term:name]"
//! link = true
//!
//! [fields.title]
//! formatter = "string"
//! link_to_entity = true
//!
//! [fields.body]
//! formatter = "text_summary"
//! trim_length = 300
//! ```
//!
//! Every section is optional. `[token_types]` extends the built-in aliases
//! (`taxonomy_term = "term"`, `taxonomy_vocabulary = "vocabulary"`) rather
//! than replacing them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use token_formatters::config::DisplayConfig;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = DisplayConfig::load(Path::new("display.toml"))?;
//! let body = config.settings_for("body")?;
//! println!("body: {}", body.summary("Content").join("; "));
//! # Ok(())
//! # }
//! ```

mod parser;
mod settings;

pub use parser::parse_config;
pub use settings::{
    FormatterSettings, ReferenceSettings, StringSettings, TextSettings, TextSummarySettings,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::core::FormatterError;
use crate::link::LinkTemplates;
use crate::presenter::FieldType;
use crate::token::{PatternIssue, TokenTypeMap, validate_pattern};

/// Display configuration loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Category to token-type aliases
    pub token_types: TokenTypeMap,
    /// URL templates per category and relation
    pub link_templates: LinkTemplates,
    /// Formatter settings per field machine name
    pub fields: BTreeMap<String, FormatterSettings>,
}

impl DisplayConfig {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if
    /// [`validate`](Self::validate) rejects it.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = parse_config(path)?;
        config
            .validate()
            .with_context(|| format!("Invalid display configuration: {}", path.display()))?;
        debug!("Loaded display settings for {} fields from {}", config.fields.len(), path.display());
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error on TOML syntax or structure errors, or if
    /// [`validate`](Self::validate) rejects the configuration.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse display configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that do not depend on a field's type.
    ///
    /// Link templates must name known relations, and every pattern must fit
    /// the length limit and contain a placeholder. Contexts are checked per
    /// field by [`validate_field`](Self::validate_field), once the owning
    /// category is known.
    ///
    /// # Errors
    ///
    /// [`FormatterError::ConfigError`] for unknown link relations and
    /// [`FormatterError::InvalidPattern`] for the first bad pattern.
    pub fn validate(&self) -> Result<(), FormatterError> {
        let unknown = self.link_templates.unknown_relations();
        if !unknown.is_empty() {
            return Err(FormatterError::ConfigError {
                message: format!(
                    "unknown link relations: {} (expected revision or canonical)",
                    unknown.join(", ")
                ),
            });
        }

        for (field, settings) in &self.fields {
            let issue = validate_pattern(settings.pattern(), &[])
                .into_iter()
                .find(|issue| !matches!(issue, PatternIssue::UnknownContext { .. }));
            if let Some(issue) = issue {
                return Err(FormatterError::InvalidPattern {
                    pattern: settings.pattern().to_string(),
                    reason: format!("field '{field}': {issue}"),
                });
            }
        }

        Ok(())
    }

    /// Validate one field's settings against its type and owning category.
    ///
    /// # Errors
    ///
    /// [`FormatterError::FieldNotConfigured`] when the field has no settings,
    /// otherwise whatever [`FormatterSettings::validate`] reports.
    pub fn validate_field(
        &self,
        field: &str,
        field_type: &FieldType,
        owner_category: &str,
    ) -> Result<(), FormatterError> {
        self.settings_for(field)?.validate(field_type, owner_category, &self.token_types)
    }

    /// Settings for `field`.
    ///
    /// # Errors
    ///
    /// [`FormatterError::FieldNotConfigured`] when the field has no entry.
    pub fn settings_for(&self, field: &str) -> Result<&FormatterSettings, FormatterError> {
        self.fields.get(field).ok_or_else(|| FormatterError::FieldNotConfigured {
            field: field.to_string(),
        })
    }
}
