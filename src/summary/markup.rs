//! Text projection of markup, used to trim without counting or splitting tags.

use std::collections::BTreeSet;

use crate::constants::{BLOCK_ELEMENTS, VOID_ELEMENTS};

/// Longest named character reference in HTML.
const MAX_ENTITY_NAME: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Open,
    Close,
    /// Void elements, `<x/>`, comments, doctypes and processing instructions
    Standalone,
}

#[derive(Debug, Clone)]
struct Tag {
    /// Byte offset just past the closing `>`
    end: usize,
    name: String,
    kind: TagKind,
}

/// Visible characters of a markup string and where each one ends.
#[derive(Debug, Default)]
pub(super) struct Projection {
    chars: Vec<char>,
    /// `ends[i]` is the byte offset just past the markup of visible char `i`
    ends: Vec<usize>,
    /// Character positions with a block-level boundary in front of them
    breaks: BTreeSet<usize>,
    tags: Vec<Tag>,
}

impl Projection {
    pub(super) fn parse(markup: &str) -> Self {
        let mut projection = Projection::default();
        let mut offset = 0;

        while offset < markup.len() {
            let rest = &markup[offset..];

            if let Some((len, tag)) = parse_tag(rest) {
                if BLOCK_ELEMENTS.contains(&tag.name.as_str()) && !projection.chars.is_empty() {
                    projection.breaks.insert(projection.chars.len());
                }
                projection.tags.push(Tag {
                    end: offset + len,
                    ..tag
                });
                offset += len;
                continue;
            }

            if let Some((len, ch)) = parse_entity(rest) {
                projection.push(ch, offset + len);
                offset += len;
                continue;
            }

            let Some(ch) = rest.chars().next() else {
                break;
            };
            offset += ch.len_utf8();
            projection.push(ch, offset);
        }

        projection
    }

    pub(super) fn chars(&self) -> &[char] {
        &self.chars
    }

    pub(super) fn breaks(&self) -> &BTreeSet<usize> {
        &self.breaks
    }

    /// Keep the first `keep` visible characters and close every element left open.
    pub(super) fn truncate(&self, markup: &str, keep: usize) -> String {
        if keep == 0 {
            return String::new();
        }
        let cut = self.ends[keep.min(self.ends.len()) - 1];

        let mut open: Vec<&str> = Vec::new();
        for tag in self.tags.iter().take_while(|tag| tag.end <= cut) {
            match tag.kind {
                TagKind::Open => open.push(&tag.name),
                TagKind::Close => {
                    if let Some(pos) = open.iter().rposition(|name| *name == tag.name) {
                        open.truncate(pos);
                    }
                }
                TagKind::Standalone => {}
            }
        }

        let mut result = markup[..cut].to_string();
        for name in open.iter().rev() {
            result.push_str("</");
            result.push_str(name);
            result.push('>');
        }
        result
    }

    fn push(&mut self, ch: char, end: usize) {
        self.chars.push(ch);
        self.ends.push(end);
    }
}

/// Parse a tag at the start of `rest`, returning its byte length.
///
/// A `<` that does not open a well-formed tag is ordinary text.
fn parse_tag(rest: &str) -> Option<(usize, Tag)> {
    let after = rest.strip_prefix('<')?;

    if let Some(comment) = after.strip_prefix("!--") {
        let len = comment.find("-->").map(|end| 4 + end + 3)?;
        return Some((len, standalone()));
    }

    let first = after.chars().next()?;
    if first == '!' || first == '?' {
        let len = after.find('>')? + 2;
        return Some((len, standalone()));
    }

    let (closing, body) = match after.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, after),
    };
    if !body.chars().next()?.is_ascii_alphabetic() {
        return None;
    }

    let name: String = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase();

    let close_at = find_tag_end(body)?;
    let len = 1 + usize::from(closing) + close_at + 1;
    let self_closing = body[..close_at].trim_end().ends_with('/');

    let kind = if closing {
        TagKind::Close
    } else if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
        TagKind::Standalone
    } else {
        TagKind::Open
    };

    Some((
        len,
        Tag {
            end: 0,
            name,
            kind,
        },
    ))
}

/// Byte index of the `>` ending a tag body, skipping quoted attribute values.
fn find_tag_end(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(idx),
            (None, '<') => return None,
            (None, _) => {}
        }
    }
    None
}

fn standalone() -> Tag {
    Tag {
        end: 0,
        name: String::new(),
        kind: TagKind::Standalone,
    }
}

/// Parse a character reference at the start of `rest` into one visible char.
///
/// References the decoder does not know stay literal text.
fn parse_entity(rest: &str) -> Option<(usize, char)> {
    let body = rest.strip_prefix('&')?;
    let semi = body
        .char_indices()
        .take(MAX_ENTITY_NAME + 1)
        .find(|(_, c)| *c == ';')
        .map(|(idx, _)| idx)?;
    let name = &body[..semi];
    let valid = match name.strip_prefix('#') {
        Some(numeric) => !numeric.is_empty() && numeric.chars().all(|c| c.is_ascii_alphanumeric()),
        None => !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric()),
    };
    if !valid {
        return None;
    }

    let len = 1 + semi + 1;
    let reference = &rest[..len];
    let decoded = html_escape::decode_html_entities(reference);
    if decoded == reference {
        return None;
    }
    decoded.chars().next().map(|ch| (len, ch))
}
