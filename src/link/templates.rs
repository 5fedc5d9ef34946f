//! Relation service driven by per-category URL templates.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{LinkRelation, LinkTarget, RelationService};
use crate::record::Record;

/// URL templates keyed by category, then by relation name.
///
/// Templates may use `{id}` and `{category}`. A category without a template
/// for a relation does not define that relation.
///
/// ```toml
/// [link_templates.node]
/// canonical = "/node/{id}"
/// revision = "/node/{id}/latest"
///
/// [link_templates.user]
/// canonical = "/user/{id}"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkTemplates {
    templates: BTreeMap<String, BTreeMap<String, String>>,
}

impl LinkTemplates {
    /// Create an empty set of templates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the template for `relation` on `category`.
    #[must_use]
    pub fn with_template(
        mut self,
        category: impl Into<String>,
        relation: LinkRelation,
        template: impl Into<String>,
    ) -> Self {
        self.templates
            .entry(category.into())
            .or_default()
            .insert(relation.as_str().to_string(), template.into());
        self
    }

    /// Relation names configured that are not known link relations.
    pub fn unknown_relations(&self) -> Vec<String> {
        self.templates
            .iter()
            .flat_map(|(category, relations)| {
                relations
                    .keys()
                    .filter(|name| LinkRelation::from_name(name).is_none())
                    .map(move |name| format!("{category}.{name}"))
            })
            .collect()
    }

    fn template(&self, category: &str, relation: LinkRelation) -> Option<&str> {
        self.templates.get(category)?.get(relation.as_str()).map(String::as_str)
    }
}

impl RelationService for LinkTemplates {
    fn has_relation(&self, record: &dyn Record, relation: LinkRelation) -> bool {
        self.template(record.category(), relation).is_some()
    }

    fn get_link(&self, record: &dyn Record, relation: LinkRelation) -> Result<Option<LinkTarget>> {
        let Some(template) = self.template(record.category(), relation) else {
            return Ok(None);
        };

        let Some(id) = record.id() else {
            bail!("{} record has no id to build a {} link", record.category(), relation);
        };

        let url = template.replace("{id}", id).replace("{category}", record.category());
        Ok(Some(LinkTarget::new(url, relation)))
    }
}
