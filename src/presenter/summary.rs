//! Summary rendering for long text fields.

use tracing::trace;

use super::field::{FieldItem, ItemValue};
use super::fragment::RenderFragment;
use super::value::FieldValuePresenter;
use crate::record::Record;
use crate::summary::{SummaryChoice, trim_markup};

/// Renders each text item as its authored summary or a trimmed full value.
///
/// An item with a non-empty authored summary renders untrimmed. With a
/// pattern set, that rendering is the resolved pattern, not the summary
/// text. The choice is made on the resolved text; the chosen text is then
/// filtered into markup and, when derived, trimmed after filtering so tags
/// stay out of the character count.
#[derive(Debug, Clone, Copy)]
pub struct SummaryPresenter<'a> {
    pub(super) values: FieldValuePresenter<'a>,
    pub(super) limit: usize,
}

impl SummaryPresenter<'_> {
    /// Render every item of a field, in delta order. Summaries never link.
    pub fn present(
        &self,
        pattern: &str,
        owner: &dyn Record,
        items: &[FieldItem<'_>],
    ) -> Vec<RenderFragment> {
        items.iter().map(|item| self.present_item(pattern, owner, item)).collect()
    }

    fn present_item(
        &self,
        pattern: &str,
        owner: &dyn Record,
        item: &FieldItem<'_>,
    ) -> RenderFragment {
        let (full, authored, format) = match &item.value {
            ItemValue::Text {
                value,
                summary,
                format,
            } => (value.clone(), summary.as_deref(), format.as_deref()),
            ItemValue::Scalar(value) => (value.clone(), None, None),
            ItemValue::Reference(record) => (record.label(), None, None),
        };

        let full = self.values.text_for(pattern, owner, &full);
        let explicit = authored
            .filter(|summary| !summary.is_empty())
            .map(|summary| self.values.text_for(pattern, owner, summary));

        let choice = SummaryChoice::for_explicit(explicit.as_deref());
        let (html, format) = match (choice, explicit) {
            (SummaryChoice::Explicit, Some(summary)) => self.values.filter_markup(&summary, format),
            _ => {
                let (markup, format) = self.values.filter_markup(&full, format);
                (trim_markup(&markup, self.limit), format)
            }
        };

        trace!("Summary for delta {} is {:?} ({} bytes)", item.delta, choice, html.len());
        RenderFragment::markup(item.delta, html, format, Some(choice))
    }
}
