//! Binding contexts: which record answers which placeholder context name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::constants::DEFAULT_TOKEN_TYPE_ALIASES;
use crate::record::Record;

/// Category to token-type alias map.
///
/// A record is always bound under its own category. When the map gives its
/// category a different token type (`taxonomy_term` -> `term`), the record is
/// bound under that name too. Entries loaded from configuration extend and
/// override [`DEFAULT_TOKEN_TYPE_ALIASES`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct TokenTypeMap {
    aliases: BTreeMap<String, String>,
}

impl TokenTypeMap {
    /// A map with no aliases at all.
    pub fn empty() -> Self {
        Self {
            aliases: BTreeMap::new(),
        }
    }

    /// Add or replace an alias.
    #[must_use]
    pub fn with_alias(mut self, category: impl Into<String>, token_type: impl Into<String>) -> Self {
        self.aliases.insert(category.into(), token_type.into());
        self
    }

    /// Token type for `category`, falling back to the category itself.
    pub fn token_type<'a>(&'a self, category: &'a str) -> &'a str {
        self.aliases.get(category).map_or(category, String::as_str)
    }
}

impl Default for TokenTypeMap {
    fn default() -> Self {
        let aliases = DEFAULT_TOKEN_TYPE_ALIASES
            .iter()
            .map(|(category, token_type)| ((*category).to_string(), (*token_type).to_string()))
            .collect();
        Self {
            aliases,
        }
    }
}

impl From<BTreeMap<String, String>> for TokenTypeMap {
    fn from(configured: BTreeMap<String, String>) -> Self {
        let mut map = Self::default();
        map.aliases.extend(configured);
        map
    }
}

impl From<TokenTypeMap> for BTreeMap<String, String> {
    fn from(map: TokenTypeMap) -> Self {
        map.aliases
    }
}

/// Named record bindings for one resolution call.
///
/// Names are unique: the first record bound under a name keeps it, and later
/// attempts to bind the same name are ignored.
#[derive(Default, Clone)]
pub struct BindingContext<'a> {
    bindings: BTreeMap<String, &'a dyn Record>,
}

impl<'a> BindingContext<'a> {
    /// Create an empty context.
    pub fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Bind `record` under `name`.
    ///
    /// Returns `false`, leaving the existing binding in place, when the name
    /// is already taken.
    pub fn bind(&mut self, name: impl Into<String>, record: &'a dyn Record) -> bool {
        let name = name.into();
        if self.bindings.contains_key(&name) {
            debug!("Binding name '{}' already registered, keeping the first record", name);
            return false;
        }
        self.bindings.insert(name, record);
        true
    }

    /// Bind `record` under its category and, if different, its token type.
    pub fn bind_record(&mut self, record: &'a dyn Record, types: &TokenTypeMap) {
        let category = record.category();
        self.bind(category, record);

        let token_type = types.token_type(category);
        if token_type != category {
            self.bind(token_type, record);
        }
    }

    /// Context for fields whose value lives on the owning record.
    pub fn for_record(record: &'a dyn Record, types: &TokenTypeMap) -> Self {
        let mut context = Self::new();
        context.bind_record(record, types);
        context
    }

    /// Context for reference fields.
    ///
    /// The referenced record is bound first so it wins every name it claims.
    /// The owning record is only added when its category differs from the
    /// referenced one; a shared category yields a single binding.
    pub fn for_reference(
        owner: &'a dyn Record,
        referenced: &'a dyn Record,
        types: &TokenTypeMap,
    ) -> Self {
        let mut context = Self::new();
        context.bind_record(referenced, types);

        if owner.category() != referenced.category() {
            context.bind_record(owner, types);
        }

        context
    }

    /// Record bound under `name`.
    pub fn get(&self, name: &str) -> Option<&'a dyn Record> {
        self.bindings.get(name).copied()
    }

    /// Bound names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Debug for BindingContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (name, record) in &self.bindings {
            map.entry(name, &format_args!("{}/{}", record.category(), record.id().unwrap_or("new")));
        }
        map.finish()
    }
}
