//! One fragment per item, in delta order, whatever happens to individual items.

use token_formatters::link::LinkRelation;
use token_formatters::presenter::{Field, FieldItem, FieldType};
use token_formatters::record::JsonRecord;
use token_formatters::test_utils::{FailingResolver, StaticRelations};

use crate::common::{Harness, linked, plain, reference_field, summary};

#[test]
fn test_empty_field_renders_nothing() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");

    let fragments = harness.presenter().render_field("[node:label]", &owner, &reference_field("user", &[]), &linked());
    assert!(fragments.is_empty());
    assert_eq!(harness.relations.lookups(), 0);
}

#[test]
fn test_order_preserved_across_mid_batch_degradation() {
    let harness = Harness::new(
        StaticRelations::new()
            .with_relation("user", LinkRelation::Canonical)
            .with_failure("user", "4"),
    );
    let owner = JsonRecord::new("node", "1");
    let records: Vec<JsonRecord> =
        (1..=8).map(|n| JsonRecord::new("user", n.to_string()).with_label(format!("#{n}"))).collect();
    let refs: Vec<&JsonRecord> = records.iter().collect();

    let fragments = harness.presenter().render_field("", &owner, &reference_field("user", &refs), &linked());

    assert_eq!(fragments.len(), 8);
    assert_eq!(fragments.iter().map(|f| f.delta).collect::<Vec<_>>(), (0..8).collect::<Vec<_>>());
    assert_eq!(
        fragments.iter().map(|f| f.content().to_string()).collect::<Vec<_>>(),
        (1..=8).map(|n| format!("#{n}")).collect::<Vec<_>>()
    );
    assert_eq!(fragments.iter().filter(|f| f.is_link()).count(), 3);
}

#[test]
fn test_property_failures_do_not_stop_the_batch() {
    let harness = Harness::with_standard_relations().with_properties(FailingResolver::failing_on(["secret"]));
    let owner = JsonRecord::new("node", "1").with_label("Owner");
    let field = Field::new("field_codes", FieldType::String)
        .with_item(FieldItem::scalar(0, "a"))
        .with_item(FieldItem::scalar(1, "b"));

    let fragments = harness.presenter().render_field("[node:secret]|[node:label]", &owner, &field, &plain());

    assert_eq!(fragments.len(), 2);
    assert!(fragments.iter().all(|f| f.content() == "|Owner"));
}

#[test]
fn test_deltas_are_carried_through_unchanged() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");
    let field = Field::new("body", FieldType::TextWithSummary)
        .with_item(FieldItem::text(3, "Three.", Some("basic_html")))
        .with_item(FieldItem::text(1, "One.", Some("basic_html")))
        .with_item(FieldItem::text(2, "", Some("basic_html")));

    let fragments = harness.presenter().render_field("", &owner, &field, &summary(100));

    assert_eq!(fragments.iter().map(|f| f.delta).collect::<Vec<_>>(), vec![3, 1, 2]);
    assert_eq!(fragments[2].content(), "");
}
