//! Constants shared by the formatter settings, token resolver and summary trimmer.

/// Default character limit for derived summaries.
pub const DEFAULT_TRIM_LENGTH: i64 = 600;

/// Maximum length of an authored pattern, in characters.
pub const MAX_PATTERN_LENGTH: usize = 1280;

/// Minimum number of placeholders a non-empty pattern must contain.
pub const MIN_PATTERN_TOKENS: usize = 1;

/// Built-in category to token-type aliases.
///
/// Some record categories are addressed by a shorter canonical name inside
/// patterns (`[term:name]` rather than `[taxonomy_term:name]`).
pub const DEFAULT_TOKEN_TYPE_ALIASES: &[(&str, &str)] =
    &[("taxonomy_term", "term"), ("taxonomy_vocabulary", "vocabulary")];

/// Elements that never have a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose boundaries count as paragraph breaks when trimming markup.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "p", "br", "div", "li", "ul", "ol", "blockquote", "pre", "h1", "h2", "h3", "h4", "h5", "h6",
    "table", "tr",
];

/// Maximum number of suggestions offered for an unknown pattern context.
pub const MAX_CONTEXT_SUGGESTIONS: usize = 3;

/// Maximum Levenshtein distance, as a percentage of the name length, for a suggestion.
pub const SIMILARITY_THRESHOLD_PERCENT: usize = 50;
