//! Link probing for formatter output.
//!
//! A [`LinkProbe`] asks an injected [`RelationService`] for a navigable
//! target for a record. It prefers the record's current-revision relation,
//! falls back to its canonical relation, and never links records that were
//! not saved yet.
//!
//! # Batch Latch
//!
//! [`LinkProbe::attempt`] shares a [`LinkCapability`] across every item of
//! one field. The first record that fails to yield a target trips the latch,
//! and every later item of that field renders as plain text even when its own
//! record could be linked. One field is therefore either linked up to the
//! first failure and plain afterwards, never a scattered mix. This is
//! deliberate and integrators relying on per-item fallback should not expect
//! it. Unsaved records are skipped without tripping the latch.

mod templates;

pub use templates::LinkTemplates;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, trace, warn};

use crate::core::FormatterError;
use crate::record::Record;

/// Named link relations a record category may define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkRelation {
    /// The record's current revision
    Revision,
    /// The record's canonical location
    Canonical,
}

impl LinkRelation {
    /// Relations in order of preference.
    pub const PREFERENCE: [LinkRelation; 2] = [LinkRelation::Revision, LinkRelation::Canonical];

    /// Machine name of the relation.
    pub const fn as_str(self) -> &'static str {
        match self {
            LinkRelation::Revision => "revision",
            LinkRelation::Canonical => "canonical",
        }
    }

    /// Parse a machine name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "revision" => Some(LinkRelation::Revision),
            "canonical" => Some(LinkRelation::Canonical),
            _ => None,
        }
    }
}

impl fmt::Display for LinkRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A navigable link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTarget {
    /// Target URL or path
    pub url: String,
    /// Relation the target was derived from
    pub relation: LinkRelation,
    /// Attributes the relation service wants on the link
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl LinkTarget {
    /// Create a target without attributes.
    pub fn new(url: impl Into<String>, relation: LinkRelation) -> Self {
        Self {
            url: url.into(),
            relation,
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Record-relation collaborator.
pub trait RelationService {
    /// Whether the record's category defines `relation`.
    fn has_relation(&self, record: &dyn Record, relation: LinkRelation) -> bool;

    /// Build the link for `relation`. `Ok(None)` means no target exists.
    fn get_link(&self, record: &dyn Record, relation: LinkRelation) -> Result<Option<LinkTarget>>;

    /// Whether the record is new and therefore has no location yet.
    fn is_new(&self, record: &dyn Record) -> bool {
        record.is_new()
    }
}

/// Batch-scoped link latch.
///
/// Starts available; once tripped it stays tripped for the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkCapability {
    available: bool,
}

impl LinkCapability {
    /// A fresh, available capability for a new batch.
    pub const fn new() -> Self {
        Self {
            available: true,
        }
    }

    /// Whether links may still be produced in this batch.
    pub const fn is_available(&self) -> bool {
        self.available
    }

    fn trip(&mut self) {
        self.available = false;
    }
}

impl Default for LinkCapability {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a single, latch-free link lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A target was found
    Linked(LinkTarget),
    /// The record is unsaved; no lookup was attempted
    Unsaved,
    /// The record cannot be linked: no relation, no target, or lookup failure
    Unlinkable,
}

/// Derives link targets through a [`RelationService`].
#[derive(Clone, Copy)]
pub struct LinkProbe<'s> {
    relations: &'s dyn RelationService,
}

impl<'s> LinkProbe<'s> {
    /// Create a probe backed by `relations`.
    pub fn new(relations: &'s dyn RelationService) -> Self {
        Self {
            relations,
        }
    }

    /// The relation to link `record` through, by preference, if any.
    pub fn relation_for(&self, record: &dyn Record) -> Option<LinkRelation> {
        LinkRelation::PREFERENCE
            .into_iter()
            .find(|relation| self.relations.has_relation(record, *relation))
    }

    /// Look up a target for `record` without touching any latch.
    pub fn lookup(&self, record: &dyn Record) -> ProbeOutcome {
        if self.relations.is_new(record) {
            trace!("Record of category '{}' is unsaved, not linking", record.category());
            return ProbeOutcome::Unsaved;
        }

        let Some(relation) = self.relation_for(record) else {
            debug!("Category '{}' defines no link relation", record.category());
            return ProbeOutcome::Unlinkable;
        };

        match self.relations.get_link(record, relation) {
            Ok(Some(target)) => ProbeOutcome::Linked(target),
            Ok(None) => {
                debug!(
                    "No {} link for {} record {}",
                    relation,
                    record.category(),
                    record.id().unwrap_or_default()
                );
                ProbeOutcome::Unlinkable
            }
            Err(e) => {
                warn!(
                    "Link lookup failed for {} record {} ({}): {:#}",
                    record.category(),
                    record.id().unwrap_or_default(),
                    relation,
                    e
                );
                ProbeOutcome::Unlinkable
            }
        }
    }

    /// Link target for a single record, if one exists.
    pub fn probe(&self, record: &dyn Record) -> Option<LinkTarget> {
        match self.lookup(record) {
            ProbeOutcome::Linked(target) => Some(target),
            ProbeOutcome::Unsaved | ProbeOutcome::Unlinkable => None,
        }
    }

    /// Like [`probe`](Self::probe), but surfaces relation service failures.
    ///
    /// For diagnostics and settings validation; the render path never uses it.
    ///
    /// # Errors
    ///
    /// [`FormatterError::CollaboratorFailed`] when the relation service fails.
    pub fn try_probe(&self, record: &dyn Record) -> Result<Option<LinkTarget>, FormatterError> {
        if self.relations.is_new(record) {
            return Ok(None);
        }
        let Some(relation) = self.relation_for(record) else {
            return Ok(None);
        };
        self.relations.get_link(record, relation).map_err(|e| FormatterError::CollaboratorFailed {
            service: "relation lookup".to_string(),
            reason: format!("{e:#}"),
        })
    }

    /// Link target for one item of a batch sharing `capability`.
    ///
    /// Returns `None` without any lookup once the latch has tripped, and
    /// trips it on the first unlinkable record.
    pub fn attempt(
        &self,
        record: &dyn Record,
        capability: &mut LinkCapability,
    ) -> Option<LinkTarget> {
        if !capability.is_available() {
            return None;
        }

        match self.lookup(record) {
            ProbeOutcome::Linked(target) => Some(target),
            ProbeOutcome::Unsaved => None,
            ProbeOutcome::Unlinkable => {
                debug!(
                    "Disabling links for the rest of the batch after {} record {}",
                    record.category(),
                    record.id().unwrap_or_default()
                );
                capability.trip();
                None
            }
        }
    }
}

impl fmt::Debug for LinkProbe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkProbe").finish_non_exhaustive()
    }
}
