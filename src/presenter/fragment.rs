//! Render output: one fragment per field item.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::link::LinkTarget;
use crate::summary::{SummaryChoice, escape_attribute, escape_html};

/// What a fragment renders as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FragmentKind {
    /// Plain text, not yet escaped
    Text {
        /// Display text
        text: String,
    },
    /// Text wrapped in a link
    Link {
        /// Link text, not yet escaped
        text: String,
        /// Navigable target
        target: LinkTarget,
        /// Attributes for the link element, item and target attributes merged
        attributes: BTreeMap<String, String>,
    },
    /// Markup produced by a text-format filter
    Markup {
        /// Filtered markup, emitted verbatim
        html: String,
        /// Format that produced the markup
        format: String,
        /// Where the value came from, for summary rendering
        summary: Option<SummaryChoice>,
    },
}

/// Output unit for one field item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderFragment {
    /// Delta of the item this fragment renders
    pub delta: usize,
    /// Rendered content
    #[serde(flatten)]
    pub kind: FragmentKind,
}

impl RenderFragment {
    /// A plain-text fragment.
    pub fn text(delta: usize, text: impl Into<String>) -> Self {
        Self {
            delta,
            kind: FragmentKind::Text {
                text: text.into(),
            },
        }
    }

    /// A link fragment. Target attributes override item attributes.
    pub fn link(
        delta: usize,
        text: impl Into<String>,
        target: LinkTarget,
        item_attributes: &BTreeMap<String, String>,
    ) -> Self {
        let mut attributes = item_attributes.clone();
        attributes.extend(target.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self {
            delta,
            kind: FragmentKind::Link {
                text: text.into(),
                target,
                attributes,
            },
        }
    }

    /// A filtered markup fragment.
    pub fn markup(
        delta: usize,
        html: impl Into<String>,
        format: impl Into<String>,
        summary: Option<SummaryChoice>,
    ) -> Self {
        Self {
            delta,
            kind: FragmentKind::Markup {
                html: html.into(),
                format: format.into(),
                summary,
            },
        }
    }

    /// Whether this fragment is a link.
    pub fn is_link(&self) -> bool {
        matches!(self.kind, FragmentKind::Link { .. })
    }

    /// The fragment's text or markup, without link wrapping.
    pub fn content(&self) -> &str {
        match &self.kind {
            FragmentKind::Text {
                text,
            }
            | FragmentKind::Link {
                text,
                ..
            } => text,
            FragmentKind::Markup {
                html,
                ..
            } => html,
        }
    }

    /// Link target, for link fragments.
    pub fn target(&self) -> Option<&LinkTarget> {
        match &self.kind {
            FragmentKind::Link {
                target,
                ..
            } => Some(target),
            _ => None,
        }
    }

    /// Render as HTML the way a host page would.
    ///
    /// Text is escaped with newlines turned into `<br />`; markup is trusted
    /// and emitted as-is.
    pub fn to_html(&self) -> String {
        match &self.kind {
            FragmentKind::Text {
                text,
            } => text_to_html(text),
            FragmentKind::Link {
                text,
                target,
                attributes,
            } => {
                let mut html = format!("<a href=\"{}\"", escape_attribute(&target.url));
                for (name, value) in attributes.iter().filter(|(name, _)| name.as_str() != "href") {
                    html.push_str(&format!(" {}=\"{}\"", escape_attribute(name), escape_attribute(value)));
                }
                html.push('>');
                html.push_str(&text_to_html(text));
                html.push_str("</a>");
                html
            }
            FragmentKind::Markup {
                html,
                ..
            } => html.clone(),
        }
    }
}

fn text_to_html(text: &str) -> String {
    text.split('\n').map(escape_html).collect::<Vec<_>>().join("<br />\n")
}
