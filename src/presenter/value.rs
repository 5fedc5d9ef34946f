//! Per-item rendering for scalar, text and reference fields.

use tracing::{debug, trace, warn};

use super::field::{FieldItem, FieldType, ItemValue};
use super::fragment::RenderFragment;
use crate::link::{LinkCapability, LinkProbe, LinkTarget};
use crate::record::Record;
use crate::summary::{FilterSet, MarkupFilter, escape_with_line_breaks};
use crate::token::{BindingContext, TokenResolver, TokenTypeMap};

/// Resolves display text per item and wraps it in links when enabled.
///
/// One call to [`present`](Self::present) is one batch: it owns a fresh
/// [`LinkCapability`] so a link failure on one item degrades every later
/// item of the same field to plain text, and nothing leaks into the next
/// call.
#[derive(Clone, Copy)]
pub struct FieldValuePresenter<'a> {
    pub(super) tokens: TokenResolver<'a>,
    pub(super) links: LinkProbe<'a>,
    pub(super) filter: &'a dyn MarkupFilter,
    pub(super) token_types: &'a TokenTypeMap,
}

impl<'a> FieldValuePresenter<'a> {
    /// Render every item of a field, in delta order.
    pub fn present(
        &self,
        pattern: &str,
        owner: &dyn Record,
        field_type: &FieldType,
        items: &[FieldItem<'_>],
        link_enabled: bool,
    ) -> Vec<RenderFragment> {
        let mut capability = LinkCapability::new();

        // The owner is the same for every item, so a self-link is probed once.
        let self_target = if link_enabled && field_type.supports_self_link() && !items.is_empty() {
            self.links.attempt(owner, &mut capability)
        } else {
            None
        };

        let fragments: Vec<_> = items
            .iter()
            .map(|item| match &item.value {
                ItemValue::Reference(referenced) => self.present_reference(
                    pattern,
                    owner,
                    *referenced,
                    item,
                    link_enabled,
                    &mut capability,
                ),
                ItemValue::Scalar(value) => {
                    let text = self.text_for(pattern, owner, value);
                    match &self_target {
                        Some(target) => {
                            RenderFragment::link(item.delta, text, target.clone(), &item.attributes)
                        }
                        None => RenderFragment::text(item.delta, text),
                    }
                }
                ItemValue::Text {
                    value,
                    format,
                    ..
                } => {
                    let text = self.text_for(pattern, owner, value);
                    let (html, format) = self.filter_markup(&text, format.as_deref());
                    RenderFragment::markup(item.delta, html, format, None)
                }
            })
            .collect();

        if !capability.is_available() {
            debug!("Link latch tripped while rendering a batch of {} items", items.len());
        }
        fragments
    }

    fn present_reference(
        &self,
        pattern: &str,
        owner: &dyn Record,
        referenced: &dyn Record,
        item: &FieldItem<'_>,
        link_enabled: bool,
        capability: &mut LinkCapability,
    ) -> RenderFragment {
        let text = if pattern.is_empty() {
            referenced.label()
        } else {
            let contexts = BindingContext::for_reference(owner, referenced, self.token_types);
            self.tokens.resolve(pattern, &contexts)
        };

        let target: Option<LinkTarget> = if link_enabled {
            self.links.attempt(referenced, capability)
        } else {
            None
        };

        match target {
            Some(target) => RenderFragment::link(item.delta, text, target, &item.attributes),
            None => RenderFragment::text(item.delta, text),
        }
    }

    /// Resolved pattern against the owner, or the raw value when no pattern is set.
    pub(super) fn text_for(&self, pattern: &str, owner: &dyn Record, raw: &str) -> String {
        if pattern.is_empty() {
            return raw.to_string();
        }
        let contexts = BindingContext::for_record(owner, self.token_types);
        self.tokens.resolve(pattern, &contexts)
    }

    /// Filter text into markup, escaping it when the filter fails.
    pub(super) fn filter_markup(&self, text: &str, format: Option<&str>) -> (String, String) {
        let format = format.unwrap_or(FilterSet::FALLBACK_FORMAT);
        match self.filter.filter(text, format) {
            Ok(filtered) => {
                trace!("Filtered {} bytes as '{}'", text.len(), filtered.format);
                (filtered.markup, filtered.format)
            }
            Err(e) => {
                warn!("Text filter failed for format '{}', escaping instead: {:#}", format, e);
                (escape_with_line_breaks(text), FilterSet::FALLBACK_FORMAT.to_string())
            }
        }
    }
}

impl std::fmt::Debug for FieldValuePresenter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldValuePresenter")
            .field("token_types", self.token_types)
            .finish_non_exhaustive()
    }
}
