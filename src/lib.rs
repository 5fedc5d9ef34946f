//! Token formatters - pattern-driven field display
//!
//! Renders the values of structured record fields into display fragments by
//! substituting `[context:property]` placeholders from bound records into an
//! authored pattern, then optionally linking the result or trimming it into a
//! summary.
//!
//! # Architecture Overview
//!
//! The pipeline runs once per field and returns one fragment per item:
//!
//! 1. **Binding** - the owning record (and, for reference fields, the
//!    referenced record) is bound under its category and token type
//! 2. **Resolution** - the pattern is resolved in a single pass; an empty
//!    pattern selects the field's default representation instead
//! 3. **Presentation** - text is wrapped in a link, filtered into markup, or
//!    trimmed into a summary
//!
//! Property lookup, link relations and text filtering are collaborators the
//! host injects; rendering itself never fails.
//!
//! # Core Modules
//!
//! - [`token`] - Placeholder scanning, binding contexts, resolution and validation
//! - [`link`] - Link probing with the batch-wide link latch
//! - [`summary`] - Summary selection, sentence-aware trimming and text filters
//! - [`presenter`] - Field and summary presenters producing render fragments
//!
//! ## Supporting Modules
//! - [`record`] - The record abstraction and a JSON-backed implementation
//! - [`config`] - TOML display configuration and per-field formatter settings
//! - [`core`] - Error types and user-facing error context
//! - [`constants`] - Limits and defaults
//!
//! # Configuration Format
//!
//! ```toml
//! [link_templates.taxonomy_term]
//! canonical = "/taxonomy/term/{id}"
//!
//! [fields.field_tags]
//! formatter = "reference"
//! tokenized_text = "#[term:label]"
//!
//! [fields.body]
//! formatter = "text_summary"
//! trim_length = 300
//! ```
//!
//! # Example
//!
//! ```rust
//! use token_formatters::config::DisplayConfig;
//! use token_formatters::presenter::{Field, FieldItem, FieldType, Presenter, RenderServices};
//! use token_formatters::record::{JsonRecord, RecordPropertyResolver};
//! use token_formatters::summary::FilterSet;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = DisplayConfig::from_toml(
//!     r##"
//!     [link_templates.taxonomy_term]
//!     canonical = "/taxonomy/term/{id}"
//!
//!     [fields.field_tags]
//!     formatter = "reference"
//!     tokenized_text = "#[term:label]"
//!     "##,
//! )?;
//!
//! let filters = FilterSet::default();
//! let services = RenderServices::new(&RecordPropertyResolver, &config.link_templates, &filters);
//! let presenter = Presenter::new(services).with_token_types(config.token_types.clone());
//!
//! let article = JsonRecord::new("node", "1");
//! let rust = JsonRecord::new("taxonomy_term", "7").with_label("rust");
//! let field = Field::new("field_tags", FieldType::EntityReference { target_category: "taxonomy_term".into() })
//!     .with_item(FieldItem::reference(0, &rust));
//!
//! let fragments = presenter.render_configured(config.settings_for("field_tags")?, &article, &field)?;
//! assert_eq!(fragments[0].to_html(), r#"<a href="/taxonomy/term/7">#rust</a>"#);
//! # Ok(())
//! # }
//! ```

// Core pipeline
pub mod link;
pub mod presenter;
pub mod summary;
pub mod token;

// Supporting modules
pub mod config;
pub mod constants;
pub mod core;
pub mod record;

// Test utilities (only compiled in test mode)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
