//! Summary rendering: choice, markup-safe trimming and filter fallbacks.

use serde_json::json;
use token_formatters::presenter::{Field, FieldItem, FieldType, FragmentKind, RenderFragment};
use token_formatters::record::JsonRecord;
use token_formatters::summary::SummaryChoice;
use token_formatters::test_utils::UppercaseFilter;

use crate::common::{Harness, summary};

fn body(items: Vec<FieldItem<'static>>) -> Field<'static> {
    items.into_iter().fold(Field::new("body", FieldType::TextWithSummary), Field::with_item)
}

fn choice(fragment: &RenderFragment) -> Option<SummaryChoice> {
    match &fragment.kind {
        FragmentKind::Markup {
            summary,
            ..
        } => *summary,
        _ => None,
    }
}

#[test]
fn test_derived_summary_breaks_at_sentence() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");
    let field = body(vec![FieldItem::text(0, "<p>Sentence one. Sentence two.</p>", Some("full_html"))]);

    let fragments = harness.presenter().render_field("", &owner, &field, &summary(14));

    assert_eq!(fragments[0].to_html(), "<p>Sentence one.</p>");
    assert_eq!(choice(&fragments[0]), Some(SummaryChoice::Derived));
}

#[test]
fn test_explicit_summary_wins_over_limit() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");
    let field = body(vec![
        FieldItem::text(0, "<p>Full text that is long.</p>", Some("full_html"))
            .with_summary("<p>A longer authored summary</p>"),
    ]);

    let fragments = harness.presenter().render_field("", &owner, &field, &summary(1));

    assert_eq!(fragments[0].to_html(), "<p>A longer authored summary</p>");
    assert_eq!(choice(&fragments[0]), Some(SummaryChoice::Explicit));
}

#[test]
fn test_pattern_replaces_authored_summary_untrimmed() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1").with_property("body", json!("Body one. Body two."));

    let field = body(vec![
        FieldItem::text(0, "ignored", Some("full_html")).with_summary("Teaser: [node:teaser]"),
        FieldItem::text(1, "ignored", Some("full_html")),
    ]);

    let fragments = harness.presenter().render_field("[node:body]", &owner, &field, &summary(12));

    // The authored summary only selects the branch; the pattern supplies the text.
    assert_eq!(fragments[0].content(), "Body one. Body two.");
    assert_eq!(choice(&fragments[0]), Some(SummaryChoice::Explicit));
    assert_eq!(fragments[1].content(), "Body one.");
    assert_eq!(choice(&fragments[1]), Some(SummaryChoice::Derived));
}

#[test]
fn test_pattern_resolving_to_nothing_is_derived() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");
    let field = body(vec![FieldItem::text(0, "ignored", Some("full_html")).with_summary("Short")]);

    let fragments = harness.presenter().render_field("[node:missing]", &owner, &field, &summary(12));

    assert_eq!(fragments[0].content(), "");
    assert_eq!(choice(&fragments[0]), Some(SummaryChoice::Derived));
}

#[test]
fn test_whitespace_summary_still_counts_as_explicit() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");
    let field = body(vec![FieldItem::text(0, "Full text here. More.", None).with_summary("\n\n")]);

    let fragments = harness.presenter().render_field("", &owner, &field, &summary(16));

    assert_eq!(fragments[0], RenderFragment::markup(0, "", "plain_text", Some(SummaryChoice::Explicit)));
}

#[test]
fn test_leading_newline_long_word_is_hard_cut() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");
    let field = body(vec![FieldItem::text(
        0,
        "<p>\nAntidisestablishmentarianism rules.</p>",
        Some("full_html"),
    )]);

    let fragments = harness.presenter().render_field("", &owner, &field, &summary(10));

    assert_eq!(fragments[0].to_html(), "<p>\nAntidises</p>");
}

#[test]
fn test_zero_limit_renders_empty_derived_summary() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");
    let field = body(vec![FieldItem::text(0, "<p>Anything.</p>", Some("full_html"))]);

    let fragments = harness.presenter().render_field("", &owner, &field, &summary(0));

    assert_eq!(fragments[0].to_html(), "");
    assert_eq!(choice(&fragments[0]), Some(SummaryChoice::Derived));
}

#[test]
fn test_markup_is_not_counted_and_never_split() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");
    let markup = r#"<p>Read <a href="https://example.com/a/very/long/path">the guide</a> now and later</p>"#;
    let field = body(vec![FieldItem::text(0, markup, Some("full_html"))]);

    let fragments = harness.presenter().render_field("", &owner, &field, &summary(20));

    assert_eq!(
        fragments[0].to_html(),
        r#"<p>Read <a href="https://example.com/a/very/long/path">the guide</a> now</p>"#
    );
}

#[test]
fn test_trim_closes_open_elements() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");
    let field = body(vec![FieldItem::text(
        0,
        "<div><p><strong>Bold words keep going</strong></p></div>",
        Some("full_html"),
    )]);

    let fragments = harness.presenter().render_field("", &owner, &field, &summary(12));

    assert_eq!(fragments[0].to_html(), "<div><p><strong>Bold words</strong></p></div>");
}

#[test]
fn test_plain_text_paragraphs_trim_at_paragraph_boundary() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");
    let field = body(vec![FieldItem::text(0, "Line one.\n\nLine two is long", None)]);

    let fragments = harness.presenter().render_field("", &owner, &field, &summary(12));

    assert_eq!(fragments[0].to_html(), "<p>Line one.</p>");
}

#[test]
fn test_custom_filter_runs_before_trimming() {
    let harness = Harness::with_standard_relations().with_filter(UppercaseFilter);
    let owner = JsonRecord::new("node", "1");
    let field = body(vec![FieldItem::text(0, "first bit. second bit.", Some("custom"))]);

    let fragments = harness.presenter().render_field("", &owner, &field, &summary(10));

    assert_eq!(fragments[0].to_html(), "<p>FIRST BIT.</p>");
}

#[test]
fn test_failing_filter_falls_back_to_escaping() {
    let harness = Harness::with_standard_relations().with_filter(UppercaseFilter);
    let owner = JsonRecord::new("node", "1");
    let field = body(vec![FieldItem::text(0, "a < b", Some("broken"))]);

    let fragments = harness.presenter().render_field("", &owner, &field, &summary(100));

    assert_eq!(
        fragments[0],
        RenderFragment::markup(0, "a &lt; b", "plain_text", Some(SummaryChoice::Derived))
    );
}
