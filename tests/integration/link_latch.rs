//! Batch link latch behaviour through the presenter.

use std::collections::BTreeMap;

use token_formatters::link::LinkRelation;
use token_formatters::presenter::{Field, FieldItem, FieldType, FragmentKind};
use token_formatters::record::JsonRecord;
use token_formatters::test_utils::StaticRelations;

use crate::common::{Harness, linked, plain, reference_field, users};

fn link_flags(fragments: &[token_formatters::presenter::RenderFragment]) -> Vec<bool> {
    fragments.iter().map(|f| f.is_link()).collect()
}

#[test]
fn test_first_unlinkable_record_disables_rest_of_batch() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");
    let users = users(4);
    let block = JsonRecord::new("block", "9").with_label("Sidebar");
    let records = [&users[0], &users[1], &block, &users[2], &users[3]];

    let fragments =
        harness.presenter().render_field("", &owner, &reference_field("user", &records), &linked());

    assert_eq!(link_flags(&fragments), vec![true, true, false, false, false]);
    assert_eq!(fragments[2].content(), "Sidebar");
    assert_eq!(fragments[4].content(), "User 4");
    // No lookups once the latch has tripped.
    assert_eq!(harness.relations.lookups(), 2);
}

#[test]
fn test_lookup_failure_trips_latch() {
    let harness = Harness::new(
        StaticRelations::new().with_relation("user", LinkRelation::Canonical).with_failure("user", "2"),
    );
    let owner = JsonRecord::new("node", "1");
    let users = users(3);

    let fragments = harness.presenter().render_field(
        "",
        &owner,
        &reference_field("user", &[&users[0], &users[1], &users[2]]),
        &linked(),
    );

    assert_eq!(link_flags(&fragments), vec![true, false, false]);
    assert_eq!(fragments.len(), 3);
}

#[test]
fn test_missing_target_trips_latch() {
    let harness = Harness::new(
        StaticRelations::new()
            .with_relation("user", LinkRelation::Canonical)
            .with_missing_target("user", "1"),
    );
    let owner = JsonRecord::new("node", "1");
    let users = users(2);

    let fragments = harness.presenter().render_field(
        "",
        &owner,
        &reference_field("user", &[&users[0], &users[1]]),
        &linked(),
    );

    assert_eq!(link_flags(&fragments), vec![false, false]);
    assert_eq!(harness.relations.lookups(), 1);
}

#[test]
fn test_unsaved_record_is_plain_without_lookup_or_trip() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");
    let draft = JsonRecord::unsaved("user").with_label("Draft");
    let saved = JsonRecord::new("user", "2").with_label("Saved");

    let fragments = harness.presenter().render_field(
        "",
        &owner,
        &reference_field("user", &[&draft, &saved]),
        &linked(),
    );

    assert_eq!(link_flags(&fragments), vec![false, true]);
    assert_eq!(fragments[0].content(), "Draft");
    assert_eq!(harness.relations.lookups(), 1);
}

#[test]
fn test_revision_relation_preferred() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("user", "1");
    let node = JsonRecord::new("node", "5").with_label("Post");
    let term = JsonRecord::new("taxonomy_term", "6").with_label("Tag");

    let presenter = harness.presenter();
    let nodes = presenter.render_field("", &owner, &reference_field("node", &[&node]), &linked());
    let terms = presenter.render_field("", &owner, &reference_field("taxonomy_term", &[&term]), &linked());

    assert_eq!(nodes[0].target().map(|t| t.relation), Some(LinkRelation::Revision));
    assert_eq!(nodes[0].to_html(), r#"<a href="/node/5/revision">Post</a>"#);
    assert_eq!(terms[0].target().map(|t| t.url.as_str()), Some("/taxonomy_term/6/canonical"));
}

#[test]
fn test_links_disabled_never_look_up() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");
    let users = users(3);

    let fragments = harness.presenter().render_field(
        "",
        &owner,
        &reference_field("user", &[&users[0], &users[1], &users[2]]),
        &plain(),
    );

    assert!(fragments.iter().all(|f| !f.is_link()));
    assert_eq!(harness.relations.lookups(), 0);
}

#[test]
fn test_each_call_starts_with_fresh_latch() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "1");
    let block = JsonRecord::new("block", "1");
    let users = users(1);
    let presenter = harness.presenter();

    let first = presenter.render_field("", &owner, &reference_field("user", &[&block, &users[0]]), &linked());
    let second = presenter.render_field("", &owner, &reference_field("user", &[&users[0]]), &linked());

    assert_eq!(link_flags(&first), vec![false, false]);
    assert_eq!(link_flags(&second), vec![true]);
}

#[test]
fn test_item_attributes_merge_with_target_attributes() {
    let harness = Harness::new(
        StaticRelations::new()
            .with_relation("user", LinkRelation::Canonical)
            .with_target_attribute("rel", "author"),
    );
    let owner = JsonRecord::new("node", "1");
    let user = JsonRecord::new("user", "3").with_label("Ada");
    let field = Field::new(
        "field_author",
        FieldType::EntityReference {
            target_category: "user".into(),
        },
    )
    .with_item(FieldItem::reference(0, &user).with_attribute("class", "byline").with_attribute("rel", "item"));

    let fragments = harness.presenter().render_field("", &owner, &field, &linked());

    match &fragments[0].kind {
        FragmentKind::Link {
            attributes,
            ..
        } => assert_eq!(
            attributes,
            &BTreeMap::from([
                ("class".to_string(), "byline".to_string()),
                ("rel".to_string(), "author".to_string()),
            ])
        ),
        other => panic!("expected a link, got {other:?}"),
    }
    assert_eq!(fragments[0].to_html(), r#"<a href="/user/3/canonical" class="byline" rel="author">Ada</a>"#);
}

#[test]
fn test_string_field_self_link_probed_once() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("node", "8").with_label("Story");
    let field = Field::new("field_aliases", FieldType::StringLong)
        .with_item(FieldItem::scalar(0, "one"))
        .with_item(FieldItem::scalar(1, "two"))
        .with_item(FieldItem::scalar(2, "three"));

    let fragments = harness.presenter().render_field("", &owner, &field, &linked());

    assert!(fragments.iter().all(|f| f.is_link()));
    assert_eq!(fragments[2].to_html(), r#"<a href="/node/8/revision">three</a>"#);
    assert_eq!(harness.relations.lookups(), 1);
}

#[test]
fn test_string_field_on_unlinkable_owner_is_plain() {
    let harness = Harness::with_standard_relations();
    let owner = JsonRecord::new("comment", "2");
    let field = Field::new("subject", FieldType::String).with_item(FieldItem::scalar(0, "Re: hi"));

    let fragments = harness.presenter().render_field("", &owner, &field, &linked());
    assert_eq!(fragments[0].to_html(), "Re: hi");
}
