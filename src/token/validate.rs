//! Pattern validation for authored formatter settings.

use std::fmt;
use strsim::levenshtein;

use super::scan;
use crate::constants::{
    MAX_CONTEXT_SUGGESTIONS, MAX_PATTERN_LENGTH, MIN_PATTERN_TOKENS, SIMILARITY_THRESHOLD_PERCENT,
};
use crate::core::FormatterError;

/// A problem found in an authored pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternIssue {
    /// The pattern exceeds [`MAX_PATTERN_LENGTH`] characters
    TooLong {
        /// Actual length in characters
        length: usize,
    },
    /// A non-empty pattern without any placeholder
    NoPlaceholders,
    /// A placeholder names a context that will never be bound for this field
    UnknownContext {
        /// The placeholder as written
        placeholder: String,
        /// The context name
        context: String,
        /// Closest allowed context names
        suggestions: Vec<String>,
    },
}

impl fmt::Display for PatternIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternIssue::TooLong {
                length,
            } => write!(
                f,
                "pattern is {length} characters long, the maximum is {MAX_PATTERN_LENGTH}"
            ),
            PatternIssue::NoPlaceholders => {
                write!(f, "pattern must contain at least {MIN_PATTERN_TOKENS} placeholder")
            }
            PatternIssue::UnknownContext {
                placeholder,
                context,
                suggestions,
            } => {
                write!(f, "{placeholder} uses unknown context '{context}'")?;
                if !suggestions.is_empty() {
                    write!(f, " (did you mean {}?)", suggestions.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// Check an authored pattern against the contexts a field will bind.
///
/// An empty pattern is valid: it selects the field's default representation.
pub fn validate_pattern(pattern: &str, allowed_contexts: &[&str]) -> Vec<PatternIssue> {
    let mut issues = Vec::new();
    if pattern.is_empty() {
        return issues;
    }

    let length = pattern.chars().count();
    if length > MAX_PATTERN_LENGTH {
        issues.push(PatternIssue::TooLong {
            length,
        });
    }

    let placeholders = scan(pattern);
    if placeholders.len() < MIN_PATTERN_TOKENS {
        issues.push(PatternIssue::NoPlaceholders);
    }

    for placeholder in placeholders {
        if allowed_contexts.contains(&placeholder.context.as_str()) {
            continue;
        }
        let suggestions = find_similar_contexts(&placeholder.context, allowed_contexts);
        issues.push(PatternIssue::UnknownContext {
            placeholder: placeholder.raw,
            context: placeholder.context,
            suggestions,
        });
    }

    issues
}

/// Like [`validate_pattern`], but fails on the first issue.
pub fn ensure_valid_pattern(
    pattern: &str,
    allowed_contexts: &[&str],
) -> Result<(), FormatterError> {
    match validate_pattern(pattern, allowed_contexts).into_iter().next() {
        None => Ok(()),
        Some(issue) => Err(FormatterError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: issue.to_string(),
        }),
    }
}

/// Find allowed context names similar to `target` using Levenshtein distance.
fn find_similar_contexts(target: &str, allowed: &[&str]) -> Vec<String> {
    let mut scored: Vec<_> =
        allowed.iter().map(|name| (*name, levenshtein(target, name))).collect();

    scored.sort_by_key(|(_, dist)| *dist);

    let max_distance = (target.len() * SIMILARITY_THRESHOLD_PERCENT / 100).max(1);
    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= max_distance)
        .take(MAX_CONTEXT_SUGGESTIONS)
        .map(|(name, _)| name.to_string())
        .collect()
}
