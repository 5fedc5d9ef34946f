//! Field rendering: the pipeline from pattern and items to display fragments.
//!
//! A [`Presenter`] renders one field of an owning record per call. For every
//! item it resolves display text (the pattern through [`TokenResolver`], or
//! the field's default representation when the pattern is empty), then either
//! wraps the text in a link, filters it into markup, or trims it into a
//! summary, depending on the field and the settings.
//!
//! # Guarantees
//!
//! - One fragment per item, in the items' delta order. Nothing is skipped,
//!   dropped or reordered, including items that degrade to plain text.
//! - Rendering never fails. Collaborator errors are logged and the affected
//!   item degrades: empty placeholder text, no link, or escaped plain text.
//! - The link latch lives for one [`Presenter::render_field`] call only.
//!
//! # Collaborators
//!
//! Property resolution, relation lookup and text filtering are injected
//! through [`RenderServices`]; the presenter never reaches into global state.
//!
//! # Examples
//!
//! ```rust
//! use token_formatters::link::{LinkRelation, LinkTemplates};
//! use token_formatters::presenter::{Field, FieldItem, FieldType, Presenter, RenderServices, RenderSettings};
//! use token_formatters::record::{JsonRecord, RecordPropertyResolver};
//! use token_formatters::summary::FilterSet;
//!
//! let links = LinkTemplates::new().with_template("taxonomy_term", LinkRelation::Canonical, "/term/{id}");
//! let filters = FilterSet::default();
//! let presenter = Presenter::new(RenderServices::new(&RecordPropertyResolver, &links, &filters));
//!
//! let article = JsonRecord::new("node", "1").with_label("Article");
//! let rust = JsonRecord::new("taxonomy_term", "5").with_label("Rust");
//! let field = Field::new("tags", FieldType::EntityReference { target_category: "taxonomy_term".into() })
//!     .with_item(FieldItem::reference(0, &rust));
//!
//! let settings = RenderSettings { link_enabled: true, trim_limit: None };
//! let fragments = presenter.render_field("#[term:label] in [node:label]", &article, &field, &settings);
//! assert_eq!(fragments[0].to_html(), r#"<a href="/term/5">#Rust in Article</a>"#);
//! ```

mod field;
mod fragment;
mod summary;
mod value;

pub use field::{Field, FieldItem, FieldType, ItemValue};
pub use fragment::{FragmentKind, RenderFragment};
pub use summary::SummaryPresenter;
pub use value::FieldValuePresenter;

use anyhow::Result;
use std::fmt;
use tracing::debug;

use crate::config::FormatterSettings;
use crate::core::FormatterError;
use crate::link::{LinkProbe, RelationService};
use crate::record::{PropertyResolver, Record};
use crate::summary::MarkupFilter;
use crate::token::{TokenResolver, TokenTypeMap};

/// Collaborators a presenter calls out to.
#[derive(Clone, Copy)]
pub struct RenderServices<'a> {
    /// Resolves placeholder property paths
    pub properties: &'a dyn PropertyResolver,
    /// Answers link relation queries
    pub relations: &'a dyn RelationService,
    /// Filters formatted text into markup
    pub filter: &'a dyn MarkupFilter,
}

impl<'a> RenderServices<'a> {
    /// Bundle the three collaborators.
    pub fn new(
        properties: &'a dyn PropertyResolver,
        relations: &'a dyn RelationService,
        filter: &'a dyn MarkupFilter,
    ) -> Self {
        Self {
            properties,
            relations,
            filter,
        }
    }
}

impl fmt::Debug for RenderServices<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderServices").finish_non_exhaustive()
    }
}

/// Per-call rendering switches supplied by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSettings {
    /// Wrap text in links where the field supports it
    pub link_enabled: bool,
    /// Render summaries trimmed to this many characters
    pub trim_limit: Option<usize>,
}

/// Renders fields through the injected collaborators.
#[derive(Debug, Clone)]
pub struct Presenter<'a> {
    services: RenderServices<'a>,
    token_types: TokenTypeMap,
}

impl<'a> Presenter<'a> {
    /// Create a presenter with the default token-type aliases.
    pub fn new(services: RenderServices<'a>) -> Self {
        Self {
            services,
            token_types: TokenTypeMap::default(),
        }
    }

    /// Replace the token-type aliases used when binding records.
    #[must_use]
    pub fn with_token_types(mut self, token_types: TokenTypeMap) -> Self {
        self.token_types = token_types;
        self
    }

    /// Render all items of `field` on `owner`.
    ///
    /// With a trim limit set, items render as summaries; otherwise as values,
    /// links or filtered markup. The returned fragments mirror `field.items`.
    pub fn render_field(
        &self,
        pattern: &str,
        owner: &dyn Record,
        field: &Field<'_>,
        settings: &RenderSettings,
    ) -> Vec<RenderFragment> {
        debug!(
            "Rendering field '{}' ({}) with {} items on {} record {}",
            field.name,
            field.field_type,
            field.items.len(),
            owner.category(),
            owner.id().unwrap_or("<new>")
        );

        let values = self.values();
        match settings.trim_limit {
            Some(limit) => SummaryPresenter {
                values,
                limit,
            }
            .present(pattern, owner, &field.items),
            None => values.present(
                pattern,
                owner,
                &field.field_type,
                &field.items,
                settings.link_enabled,
            ),
        }
    }

    /// Render `field` with persisted formatter settings.
    ///
    /// # Errors
    ///
    /// Returns [`FormatterError::IncompatibleField`] when the formatter cannot
    /// display the field's type. Rendering itself never fails.
    pub fn render_configured(
        &self,
        settings: &FormatterSettings,
        owner: &dyn Record,
        field: &Field<'_>,
    ) -> Result<Vec<RenderFragment>> {
        if !settings.applies_to(&field.field_type) {
            return Err(FormatterError::IncompatibleField {
                formatter: settings.kind_name().to_string(),
                field_type: field.field_type.machine_name().to_string(),
            }
            .into());
        }

        Ok(self.render_field(settings.pattern(), owner, field, &settings.render_settings()))
    }

    fn values(&self) -> FieldValuePresenter<'_> {
        FieldValuePresenter {
            tokens: TokenResolver::new(self.services.properties),
            links: LinkProbe::new(self.services.relations),
            filter: self.services.filter,
            token_types: &self.token_types,
        }
    }
}
