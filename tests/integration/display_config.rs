//! Rendering with settings loaded from a display configuration file.

use serde_json::json;
use tempfile::TempDir;
use token_formatters::config::{DisplayConfig, FormatterSettings};
use token_formatters::core::{FormatterError, user_friendly_error};
use token_formatters::presenter::{Field, FieldItem, FieldType, Presenter, RenderServices};
use token_formatters::record::{JsonRecord, RecordPropertyResolver};
use token_formatters::summary::{FilterSet, SummaryChoice};
use token_formatters::test_utils::{DISPLAY_CONFIG, init_test_logging};

fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("display.toml");
    std::fs::write(&path, content).unwrap();
    (temp, path)
}

fn load_fixture() -> (TempDir, DisplayConfig) {
    init_test_logging(None);
    let (temp, path) = write_config(DISPLAY_CONFIG);
    (temp, DisplayConfig::load(&path).unwrap())
}

#[test]
fn test_load_and_render_every_configured_field() {
    let (_temp, config) = load_fixture();
    let filters = FilterSet::default();
    let presenter = Presenter::new(RenderServices::new(&RecordPropertyResolver, &config.link_templates, &filters))
        .with_token_types(config.token_types.clone());

    let article = JsonRecord::new("node", "5").with_label("Hello");
    let rust = JsonRecord::new("taxonomy_term", "3").with_label("rust");
    let ada = JsonRecord::new("user", "2").with_label("Ada");

    let tags = Field::new(
        "field_tags",
        FieldType::EntityReference {
            target_category: "taxonomy_term".into(),
        },
    )
    .with_item(FieldItem::reference(0, &rust));
    let author = Field::new(
        "field_author",
        FieldType::EntityReference {
            target_category: "user".into(),
        },
    )
    .with_item(FieldItem::reference(0, &ada));
    let title = Field::new("title", FieldType::String).with_item(FieldItem::scalar(0, "Hello"));
    let note = Field::new("field_note", FieldType::TextLong)
        .with_item(FieldItem::text(0, "Remember\nthis", Some("plain_text")));
    let body = Field::new("body", FieldType::TextWithSummary).with_item(FieldItem::text(
        0,
        "<p>The first sentence is here. The second sentence follows.</p>",
        Some("basic_html"),
    ));

    let render = |field: &Field<'_>| {
        let settings = config.settings_for(&field.name).unwrap();
        config.validate_field(&field.name, &field.field_type, "node").unwrap();
        presenter.render_configured(settings, &article, field).unwrap()
    };

    assert_eq!(render(&tags)[0].to_html(), r#"<a href="/taxonomy/term/3">#rust</a>"#);
    assert_eq!(render(&author)[0].to_html(), "Ada");
    assert_eq!(render(&title)[0].to_html(), r#"<a href="/node/5/latest">Hello (5)</a>"#);
    assert_eq!(render(&note)[0].to_html(), "Remember<br />\nthis");

    let summary = render(&body);
    assert_eq!(summary[0].to_html(), "<p>The first sentence is here.</p>");
    assert!(matches!(
        summary[0].kind,
        token_formatters::presenter::FragmentKind::Markup {
            summary: Some(SummaryChoice::Derived),
            ..
        }
    ));
}

#[test]
fn test_settings_summaries_from_config() {
    let (_temp, config) = load_fixture();

    let lines = |field: &str| config.settings_for(field).unwrap().summary("Content");

    assert_eq!(lines("field_tags"), vec!["#[term:label]", "Link to the referenced entity"]);
    assert_eq!(lines("field_author"), vec!["No link"]);
    assert_eq!(lines("title"), vec!["[node:label] ([node:id])", "Linked to the Content"]);
    assert!(lines("field_note").is_empty());
    assert_eq!(lines("body"), vec!["Trimmed limit: 40 characters"]);
}

#[test]
fn test_incompatible_formatter_is_rejected() {
    let (_temp, config) = load_fixture();
    let filters = FilterSet::default();
    let presenter = Presenter::new(RenderServices::new(&RecordPropertyResolver, &config.link_templates, &filters));
    let article = JsonRecord::new("node", "5");
    let body = Field::new("body", FieldType::String).with_item(FieldItem::scalar(0, "x"));

    let err = presenter.render_configured(config.settings_for("body").unwrap(), &article, &body).unwrap_err();
    let context = user_friendly_error(err);

    assert_eq!(
        context.error,
        FormatterError::IncompatibleField {
            formatter: "text_summary".into(),
            field_type: "string".into(),
        }
    );
    assert!(context.suggestion.is_some());
}

#[test]
fn test_unknown_context_reported_with_suggestion() {
    let (_temp, config) = load_fixture();
    let settings = FormatterSettings::reference("[trem:label]", true);
    let tags = FieldType::EntityReference {
        target_category: "taxonomy_term".into(),
    };

    let err = settings.validate(&tags, "node", &config.token_types).unwrap_err();
    assert_eq!(err.to_string(), "Invalid pattern '[trem:label]': [trem:label] uses unknown context 'trem' (did you mean term?)");
}

#[test]
fn test_broken_config_file_errors() {
    let (_temp, path) = write_config("[fields.body]\nformatter = \"summary_trimmed\"\n");
    let err = DisplayConfig::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config file"));

    let (_temp, path) = write_config("[fields.title]\nformatter = \"string\"\ntokenized_text = \"x\"\n");
    let err = DisplayConfig::load(&path).unwrap_err();
    let context = user_friendly_error(err);
    assert!(matches!(context.error, FormatterError::InvalidPattern { .. }));
    assert_eq!(
        context.suggestion.as_deref(),
        Some("Patterns use placeholders of the form [context:property]")
    );
}

#[test]
fn test_json_records_from_host_payload() {
    init_test_logging(None);
    let record: JsonRecord = serde_json::from_value(json!({
        "category": "node",
        "id": "12",
        "label": "From JSON",
        "properties": {"summary": "Short"}
    }))
    .unwrap();
    let filters = FilterSet::default();
    let templates = token_formatters::link::LinkTemplates::new();
    let presenter = Presenter::new(RenderServices::new(&RecordPropertyResolver, &templates, &filters));
    let field = Field::new("title", FieldType::String).with_item(FieldItem::scalar(0, "raw"));

    let fragments = presenter
        .render_configured(&FormatterSettings::string("[node:label]: [node:summary]", true), &record, &field)
        .unwrap();

    assert_eq!(fragments[0].to_html(), "From JSON: Short");
}
