//! Scriptable collaborators and sample configuration.

use anyhow::{Result, bail};
use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use crate::link::{LinkRelation, LinkTarget, RelationService};
use crate::record::{PropertyResolver, Record, RecordPropertyResolver};
use crate::summary::{FilteredText, MarkupFilter, escape_html};

/// A display configuration touching every section and formatter kind.
pub const DISPLAY_CONFIG: &str = r##"
[token_types]
commerce_product = "product"

[link_templates.node]
canonical = "/node/{id}"
revision = "/node/{id}/latest"

[link_templates.user]
canonical = "/user/{id}"

[link_templates.taxonomy_term]
canonical = "/taxonomy/term/{id}"

[fields.field_tags]
formatter = "reference"
tokenized_text = "#[term:label]"

[fields.field_author]
formatter = "reference"
link = false

[fields.title]
formatter = "string"
tokenized_text = "[node:label] ([node:id])"
link_to_entity = true

[fields.field_note]
formatter = "text"

[fields.body]
formatter = "text_summary"
trim_length = 40
"##;

/// Relation service with relations declared per category.
///
/// Declared relations link to `/{category}/{id}/{relation}`. Individual
/// records can be made to fail or to have no target. Every `get_link` call
/// is counted.
#[derive(Debug, Default)]
pub struct StaticRelations {
    relations: BTreeMap<String, BTreeSet<LinkRelation>>,
    failures: BTreeSet<(String, String)>,
    missing: BTreeSet<(String, String)>,
    attributes: BTreeMap<String, String>,
    lookups: Cell<usize>,
}

impl StaticRelations {
    /// No relations at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `relation` for every record of `category`.
    #[must_use]
    pub fn with_relation(mut self, category: impl Into<String>, relation: LinkRelation) -> Self {
        self.relations.entry(category.into()).or_default().insert(relation);
        self
    }

    /// Make lookups for one record fail with an error.
    #[must_use]
    pub fn with_failure(mut self, category: impl Into<String>, id: impl Into<String>) -> Self {
        self.failures.insert((category.into(), id.into()));
        self
    }

    /// Make lookups for one record succeed without a target.
    #[must_use]
    pub fn with_missing_target(
        mut self,
        category: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        self.missing.insert((category.into(), id.into()));
        self
    }

    /// Attach an attribute to every produced target.
    #[must_use]
    pub fn with_target_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Number of `get_link` calls so far.
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl RelationService for StaticRelations {
    fn has_relation(&self, record: &dyn Record, relation: LinkRelation) -> bool {
        self.relations.get(record.category()).is_some_and(|set| set.contains(&relation))
    }

    fn get_link(&self, record: &dyn Record, relation: LinkRelation) -> Result<Option<LinkTarget>> {
        self.lookups.set(self.lookups.get() + 1);

        let key = (record.category().to_string(), record.id().unwrap_or_default().to_string());
        if self.failures.contains(&key) {
            bail!("relation lookup failed for {}/{}", key.0, key.1);
        }
        if self.missing.contains(&key) {
            return Ok(None);
        }

        let mut target = LinkTarget::new(format!("/{}/{}/{}", key.0, key.1, relation), relation);
        target.attributes.extend(self.attributes.clone());
        Ok(Some(target))
    }
}

/// Property resolver that fails for selected paths and otherwise defers to
/// [`RecordPropertyResolver`].
#[derive(Debug, Clone, Default)]
pub struct FailingResolver {
    paths: BTreeSet<String>,
}

impl FailingResolver {
    /// Fail for each of `paths`.
    pub fn failing_on<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl PropertyResolver for FailingResolver {
    fn resolve(&self, path: &str, record: &dyn Record) -> Result<String> {
        if self.paths.contains(path) {
            bail!("token service unavailable for '{path}'");
        }
        RecordPropertyResolver.resolve(path, record)
    }
}

/// Filter that escapes and upper-cases text inside a `<p>`.
///
/// Fails for the format `broken`, to exercise filter fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct UppercaseFilter;

impl MarkupFilter for UppercaseFilter {
    fn filter(&self, text: &str, format: &str) -> Result<FilteredText> {
        if format == "broken" {
            bail!("filter '{format}' is misconfigured");
        }
        Ok(FilteredText {
            markup: format!("<p>{}</p>", escape_html(&text.to_uppercase())),
            format: format.to_string(),
        })
    }
}
