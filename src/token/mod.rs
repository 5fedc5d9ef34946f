//! Placeholder substitution for formatter patterns.
//!
//! A pattern is ordinary text containing zero or more placeholders of the
//! form `[context:property]`. Each placeholder names a binding in a
//! [`BindingContext`] and a property path that a [`PropertyResolver`] turns
//! into text for the bound record.
//!
//! # Resolution Rules
//!
//! - Placeholders are replaced in a single left-to-right pass. Substituted
//!   text is never re-scanned, so a property value that itself looks like a
//!   placeholder is emitted literally.
//! - A placeholder naming an unbound context, or a property the record does
//!   not have, becomes an empty string. Surrounding text is kept verbatim.
//! - Text in brackets that does not match the placeholder syntax (no colon,
//!   whitespace in the context name, nested brackets) is not a placeholder
//!   and passes through unchanged.
//! - Resolution is deterministic and side-effect free apart from logging.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use token_formatters::record::{JsonRecord, RecordPropertyResolver};
//! use token_formatters::token::{BindingContext, TokenResolver};
//!
//! let node = JsonRecord::new("node", "1").with_property("title", json!("Hello"));
//! let mut contexts = BindingContext::new();
//! contexts.bind("node", &node);
//!
//! let properties = RecordPropertyResolver;
//! let resolver = TokenResolver::new(&properties);
//! assert_eq!(resolver.resolve("Title: [node:title][user:name]", &contexts), "Title: Hello");
//! ```

mod context;
mod validate;

pub use context::{BindingContext, TokenTypeMap};
pub use validate::{PatternIssue, ensure_valid_pattern, validate_pattern};

use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;
use tracing::{trace, warn};

use crate::record::PropertyResolver;

/// Placeholder syntax: a context name without whitespace, brackets or colons,
/// then a colon, then a property path without brackets.
const PLACEHOLDER_PATTERN: &str = r"\[([^\s\[\]:]+):([^\[\]]+)\]";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is valid"));

/// One placeholder found in a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Context (binding) name
    pub context: String,
    /// Property path within the bound record
    pub property: String,
    /// The placeholder as written, brackets included
    pub raw: String,
    /// Byte range of the placeholder in the pattern
    pub span: Range<usize>,
}

/// List the placeholders of a pattern in order of appearance.
pub fn scan(pattern: &str) -> Vec<Placeholder> {
    PLACEHOLDER
        .captures_iter(pattern)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Placeholder {
                context: caps[1].to_string(),
                property: caps[2].to_string(),
                raw: whole.as_str().to_string(),
                span: whole.range(),
            })
        })
        .collect()
}

/// Whether the pattern contains at least one placeholder.
pub fn has_placeholders(pattern: &str) -> bool {
    PLACEHOLDER.is_match(pattern)
}

/// Substitutes placeholders using an injected property resolver.
#[derive(Clone, Copy)]
pub struct TokenResolver<'r> {
    properties: &'r dyn PropertyResolver,
}

impl<'r> TokenResolver<'r> {
    /// Create a resolver backed by `properties`.
    pub fn new(properties: &'r dyn PropertyResolver) -> Self {
        Self {
            properties,
        }
    }

    /// Replace every placeholder in `pattern` using `contexts`.
    ///
    /// Never fails; see the module documentation for how unresolvable
    /// placeholders are handled.
    pub fn resolve(&self, pattern: &str, contexts: &BindingContext<'_>) -> String {
        if !has_placeholders(pattern) {
            return pattern.to_string();
        }

        PLACEHOLDER
            .replace_all(pattern, |caps: &Captures<'_>| {
                self.resolve_placeholder(&caps[1], &caps[2], contexts)
            })
            .into_owned()
    }

    fn resolve_placeholder(
        &self,
        context: &str,
        property: &str,
        contexts: &BindingContext<'_>,
    ) -> String {
        let Some(record) = contexts.get(context) else {
            trace!("No binding for placeholder context '{}', substituting empty text", context);
            return String::new();
        };

        match self.properties.resolve(property, record) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "Failed to resolve [{}:{}] for {} record {}: {:#}",
                    context,
                    property,
                    record.category(),
                    record.id().unwrap_or("<new>"),
                    e
                );
                String::new()
            }
        }
    }
}

impl std::fmt::Debug for TokenResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResolver").finish_non_exhaustive()
    }
}
