//! Text-format filters that turn stored text into display markup.

use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Markup produced by a filter, tagged with the format that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredText {
    /// Display-ready markup
    pub markup: String,
    /// Text format that was applied
    pub format: String,
}

/// Text-format filtering collaborator.
pub trait MarkupFilter {
    /// Filter `text` stored in `format` into display markup.
    fn filter(&self, text: &str, format: &str) -> Result<FilteredText>;
}

/// Escapes everything and turns line structure into paragraphs and `<br />`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFilter;

impl MarkupFilter for PlainTextFilter {
    fn filter(&self, text: &str, format: &str) -> Result<FilteredText> {
        Ok(FilteredText {
            markup: escape_with_line_breaks(text),
            format: format.to_string(),
        })
    }
}

/// Leaves trusted markup untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFilter;

impl MarkupFilter for PassthroughFilter {
    fn filter(&self, text: &str, format: &str) -> Result<FilteredText> {
        Ok(FilteredText {
            markup: text.to_string(),
            format: format.to_string(),
        })
    }
}

/// Filters registered by format name, with a fallback for unknown formats.
///
/// Defaults: `plain_text` escapes, `basic_html` and `full_html` pass through.
/// Unknown or missing formats use the `plain_text` filter.
pub struct FilterSet {
    filters: BTreeMap<String, Box<dyn MarkupFilter + Send + Sync>>,
    fallback: String,
}

impl FilterSet {
    /// Name of the format used when none is given or the given one is unknown.
    pub const FALLBACK_FORMAT: &'static str = "plain_text";

    /// An empty set; every format falls back to escaping.
    pub fn empty() -> Self {
        Self {
            filters: BTreeMap::new(),
            fallback: Self::FALLBACK_FORMAT.to_string(),
        }
    }

    /// Register (or replace) the filter for `format`.
    #[must_use]
    pub fn with_filter(
        mut self,
        format: impl Into<String>,
        filter: impl MarkupFilter + Send + Sync + 'static,
    ) -> Self {
        self.filters.insert(format.into(), Box::new(filter));
        self
    }

    /// Registered format names.
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::empty()
            .with_filter("plain_text", PlainTextFilter)
            .with_filter("basic_html", PassthroughFilter)
            .with_filter("full_html", PassthroughFilter)
    }
}

impl MarkupFilter for FilterSet {
    fn filter(&self, text: &str, format: &str) -> Result<FilteredText> {
        let requested = if format.is_empty() {
            self.fallback.as_str()
        } else {
            format
        };

        match self.filters.get(requested) {
            Some(filter) => filter.filter(text, requested),
            None => {
                debug!("Unknown text format '{}', using '{}'", requested, self.fallback);
                match self.filters.get(&self.fallback) {
                    Some(filter) => filter.filter(text, &self.fallback),
                    None => PlainTextFilter.filter(text, &self.fallback),
                }
            }
        }
    }
}

impl fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSet")
            .field("formats", &self.filters.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Escape text content: `&`, `<` and `>`.
pub fn escape_html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Escape a value for use inside a double-quoted attribute.
pub fn escape_attribute(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Escape `text`, wrap blank-line separated blocks in `<p>` and turn single
/// newlines into `<br />`.
///
/// Text without any blank line is escaped without a paragraph wrapper.
pub fn escape_with_line_breaks(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let trimmed = normalized.trim_matches('\n');
    if trimmed.is_empty() {
        return String::new();
    }

    let paragraphs: Vec<&str> =
        trimmed.split("\n\n").map(|p| p.trim_matches('\n')).filter(|p| !p.is_empty()).collect();

    let render = |paragraph: &str| {
        paragraph.split('\n').map(escape_html).collect::<Vec<_>>().join("<br />\n")
    };

    if paragraphs.len() == 1 {
        return render(paragraphs[0]);
    }

    paragraphs.iter().map(|p| format!("<p>{}</p>", render(p))).collect::<Vec<_>>().join("\n")
}
