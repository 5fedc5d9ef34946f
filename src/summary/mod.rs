//! Summary selection and sentence-aware trimming.
//!
//! A summary is either the explicit value an author wrote, or a derived value
//! trimmed from the full text. [`select`] picks between them for plain text;
//! [`select_markup`] does the same for filtered markup, measuring the limit on
//! the visible text only and never cutting through a tag.
//!
//! # Trimming Rules
//!
//! Text no longer than the limit is returned whole. Otherwise the cut lands,
//! in order of preference:
//!
//! 1. after the last sentence end (`.`, `!`, `?` followed by whitespace, or a
//!    paragraph boundary in markup) at or before the limit
//! 2. at the last word boundary at or before the limit
//! 3. exactly at the limit, when a single word is longer than the limit
//!
//! Trailing whitespace is dropped from the result. A limit of zero yields an
//! empty string. Limits count characters, not bytes.
//!
//! Trimming always runs on token-resolved text; trimming a raw pattern could
//! cut a placeholder in half.
//!
//! # Examples
//!
//! ```rust
//! use token_formatters::summary::{SummaryChoice, select};
//!
//! let (text, choice) = select(None, "Sentence one. Sentence two.", 14);
//! assert_eq!(text, "Sentence one.");
//! assert_eq!(choice, SummaryChoice::Derived);
//!
//! let (text, choice) = select(Some("S"), "full text...", 1);
//! assert_eq!((text.as_str(), choice), ("S", SummaryChoice::Explicit));
//! ```

mod filter;
mod markup;

pub use filter::{
    FilterSet, FilteredText, MarkupFilter, PassthroughFilter, PlainTextFilter, escape_attribute,
    escape_html, escape_with_line_breaks,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use markup::Projection;

/// Which value a summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryChoice {
    /// An authored summary was present and used verbatim
    Explicit,
    /// No authored summary; the full value was trimmed
    Derived,
}

impl SummaryChoice {
    /// Choice for an optional authored summary; empty counts as absent.
    pub fn for_explicit(explicit: Option<&str>) -> Self {
        match explicit {
            Some(summary) if !summary.is_empty() => SummaryChoice::Explicit,
            _ => SummaryChoice::Derived,
        }
    }
}

/// Convert a configured trim length into a limit; zero or negative means nothing fits.
pub fn limit_from_setting(trim_length: i64) -> usize {
    usize::try_from(trim_length).unwrap_or(0)
}

/// Pick between an explicit summary and a trimmed copy of `full`.
///
/// A non-empty `explicit` is returned unmodified and `limit` is ignored.
pub fn select(explicit: Option<&str>, full: &str, limit: usize) -> (String, SummaryChoice) {
    match (SummaryChoice::for_explicit(explicit), explicit) {
        (SummaryChoice::Explicit, Some(summary)) => (summary.to_string(), SummaryChoice::Explicit),
        _ => (trim_text(full, limit), SummaryChoice::Derived),
    }
}

/// Markup counterpart of [`select`]: the derived branch uses [`trim_markup`].
pub fn select_markup(
    explicit: Option<&str>,
    full_markup: &str,
    limit: usize,
) -> (String, SummaryChoice) {
    match (SummaryChoice::for_explicit(explicit), explicit) {
        (SummaryChoice::Explicit, Some(summary)) => (summary.to_string(), SummaryChoice::Explicit),
        _ => (trim_markup(full_markup, limit), SummaryChoice::Derived),
    }
}

/// Trim plain text to at most `limit` characters.
pub fn trim_text(text: &str, limit: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let keep = cut_point(&chars, &BTreeSet::new(), limit);
    chars[..keep].iter().collect()
}

/// Trim markup so that at most `limit` visible characters remain.
///
/// The cut point is chosen on the text projection of the markup, mapped back
/// to a byte offset that never falls inside a tag or entity, and any elements
/// still open at that point are closed.
pub fn trim_markup(markup: &str, limit: usize) -> String {
    let projection = Projection::parse(markup);
    let keep = cut_point(projection.chars(), projection.breaks(), limit);

    if keep == projection.chars().len() {
        return markup.to_string();
    }
    projection.truncate(markup, keep)
}

const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', '\u{3002}', '\u{FF01}', '\u{FF1F}'];
/// Full-width terminators end a sentence even when text follows directly.
const FULL_WIDTH_TERMINATORS: &[char] = &['\u{3002}', '\u{FF01}', '\u{FF1F}'];
const SENTENCE_CLOSERS: &[char] = &['"', '\'', ')', '\u{201D}', '\u{2019}'];

/// Number of leading characters to keep.
///
/// `breaks` holds positions (in characters) where a paragraph boundary sits
/// between two characters.
fn cut_point(chars: &[char], breaks: &BTreeSet<usize>, limit: usize) -> usize {
    let len = chars.len();
    if len <= limit {
        return len;
    }
    if limit == 0 {
        return 0;
    }

    let is_break = |pos: usize| breaks.contains(&pos);
    let boundary_after = |pos: usize| pos == len || chars[pos].is_whitespace() || is_break(pos);
    // A break is only usable when something visible stays in front of it.
    let first_visible = chars.iter().position(|c| !c.is_whitespace()).unwrap_or(len);

    let sentence = (first_visible + 1..=limit).rev().find(|&pos| {
        if is_break(pos) || FULL_WIDTH_TERMINATORS.contains(&chars[pos - 1]) {
            return true;
        }
        if !boundary_after(pos) {
            return false;
        }
        let last = chars[pos - 1];
        SENTENCE_TERMINATORS.contains(&last)
            || (pos >= 2
                && SENTENCE_CLOSERS.contains(&last)
                && SENTENCE_TERMINATORS.contains(&chars[pos - 2]))
    });

    let word = || {
        (first_visible + 1..=limit)
            .rev()
            .find(|&pos| boundary_after(pos) || chars[pos - 1].is_whitespace())
    };

    let mut keep = sentence.or_else(word).unwrap_or(limit);
    while keep > 0 && chars[keep - 1].is_whitespace() {
        keep -= 1;
    }
    keep
}
