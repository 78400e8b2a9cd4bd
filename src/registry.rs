//! Tag registry: definitions of the tags a parse will recognize.
//!
//! A [`TagRegistry`] maps case-insensitive tag names (canonical name plus any
//! synonyms) to immutable [`TagDefinition`]s. Registries can chain to a parent
//! for fallback lookup, which lets a host layer its own tags on top of the
//! shared [`TagRegistry::standard`] set without hidden global state.
//!
//! Re-registering a name silently replaces the previous definition; hosts that
//! need stricter guarantees should probe with [`TagRegistry::find`] first.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Serialize;

/// Tag names recognized as list containers by the list-item splicing rule.
pub const LIST_CONTAINERS: [&str; 5] = ["list", "ordered-list", "olist", "unordered-list", "ulist"];

/// Returns `true` when the (already lowercased) tag names a list container.
pub fn is_list_container(tag: &str) -> bool {
    LIST_CONTAINERS.contains(&tag)
}

/// A blacklist rule declared by a tag against certain child tags.
///
/// The rule is suspended while any tag named in `overridden_by` is open below
/// the declaring tag, letting a descendant re-enable a tag its ancestor banned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlacklistEntry {
    pub tag: String,
    pub overridden_by: Vec<String>,
}

impl BlacklistEntry {
    pub fn new(tag: &str) -> Self {
        BlacklistEntry {
            tag: tag.to_string(),
            overridden_by: Vec::new(),
        }
    }

    pub fn overridden_by(mut self, tags: &[&str]) -> Self {
        self.overridden_by = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

/// Immutable description of a single tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagDefinition {
    pub canonical_name: String,
    pub synonyms: Vec<String>,
    /// The tag has no body and never pushes onto the open stack, e.g. `[br]`.
    pub instant_close: bool,
    pub blacklist_children: Vec<BlacklistEntry>,
    /// When present, only the listed child tags parse inside this tag; an
    /// empty list suppresses all nested tag recognition (e.g. `[no-parse]`).
    pub whitelist_children: Option<Vec<String>>,
    /// The tag may open even where an ancestor's filter would reject it,
    /// unless the parse enforces filters on exempt tags.
    pub ignore_filter_when_unlisted: bool,
}

impl TagDefinition {
    pub fn new(canonical_name: &str) -> Self {
        TagDefinition {
            canonical_name: canonical_name.to_string(),
            synonyms: Vec::new(),
            instant_close: false,
            blacklist_children: Vec::new(),
            whitelist_children: None,
            ignore_filter_when_unlisted: false,
        }
    }

    pub fn with_synonyms(mut self, synonyms: &[&str]) -> Self {
        self.synonyms = synonyms.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_instant_close(mut self) -> Self {
        self.instant_close = true;
        self
    }

    pub fn with_whitelist(mut self, children: &[&str]) -> Self {
        self.whitelist_children = Some(children.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_blacklist(mut self, entries: Vec<BlacklistEntry>) -> Self {
        self.blacklist_children = entries;
        self
    }

    pub fn exempt_from_filters(mut self) -> Self {
        self.ignore_filter_when_unlisted = true;
        self
    }

    /// All names this definition answers to: canonical name first, then synonyms.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical_name.as_str()).chain(self.synonyms.iter().map(String::as_str))
    }
}

/// Case-insensitive index of tag definitions with optional parent fallback.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    tags: HashMap<String, Arc<TagDefinition>>,
    parent: Option<Arc<TagRegistry>>,
}

impl TagRegistry {
    /// Creates an empty registry with no parent.
    pub fn new() -> Self {
        TagRegistry::default()
    }

    /// Creates an empty registry that falls back to `parent` on lookup misses.
    pub fn with_parent(parent: Arc<TagRegistry>) -> Self {
        TagRegistry {
            tags: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Indexes the definition under its canonical name and every synonym,
    /// case-insensitively. An existing definition under any of those names is
    /// silently replaced.
    pub fn register(&mut self, definition: TagDefinition) {
        let definition = Arc::new(definition);
        let names: Vec<String> = definition.names().map(|n| n.to_ascii_lowercase()).collect();
        for name in names {
            self.tags.insert(name, Arc::clone(&definition));
        }
    }

    /// Case-insensitive lookup, delegating to the parent chain on a local miss.
    pub fn find(&self, name: &str) -> Option<Arc<TagDefinition>> {
        let key = name.to_ascii_lowercase();
        if let Some(definition) = self.tags.get(&key) {
            return Some(Arc::clone(definition));
        }
        self.parent.as_ref().and_then(|parent| parent.find(&key))
    }

    /// All distinct definitions reachable from this registry, including
    /// inherited ones. A child definition shadows a parent definition with the
    /// same canonical name. Sorted by canonical name for stable output.
    pub fn list(&self) -> Vec<Arc<TagDefinition>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut definitions = Vec::new();
        let mut current = Some(self);
        while let Some(registry) = current {
            for definition in registry.tags.values() {
                if seen.insert(definition.canonical_name.to_ascii_lowercase()) {
                    definitions.push(Arc::clone(definition));
                }
            }
            current = registry.parent.as_deref();
        }
        definitions.sort_by(|a, b| a.canonical_name.cmp(&b.canonical_name));
        definitions
    }

    /// The shared registry holding the standard tag set.
    pub fn standard() -> Arc<TagRegistry> {
        Arc::clone(&STANDARD)
    }
}

static STANDARD: Lazy<Arc<TagRegistry>> = Lazy::new(|| {
    let mut registry = TagRegistry::new();

    registry.register(
        TagDefinition::new("no-parse")
            .with_synonyms(&["noparse"])
            .with_whitelist(&[])
            .exempt_from_filters(),
    );

    registry.register(TagDefinition::new("c").with_synonyms(&["center"]));
    registry.register(TagDefinition::new("r").with_synonyms(&["right"]));
    registry.register(TagDefinition::new("l").with_synonyms(&["left"]));

    registry.register(
        TagDefinition::new("code")
            .with_synonyms(&["icode", "i-code"])
            .with_whitelist(&[]),
    );

    registry.register(TagDefinition::new("color").with_synonyms(&["bg-color", "bgcolor"]));
    registry.register(TagDefinition::new("face").with_synonyms(&["font"]));
    registry.register(TagDefinition::new("size"));

    registry.register(TagDefinition::new("b").with_synonyms(&["bold", "strong"]));
    registry.register(TagDefinition::new("i").with_synonyms(&["italic"]));
    registry.register(TagDefinition::new("u").with_synonyms(&["underlined"]));
    registry.register(TagDefinition::new("s").with_synonyms(&["strikethrough"]));

    registry.register(TagDefinition::new("url"));
    registry.register(TagDefinition::new("img"));

    registry.register(TagDefinition::new("sub"));
    registry.register(TagDefinition::new("sup"));

    registry.register(
        TagDefinition::new("hr")
            .with_synonyms(&["br"])
            .with_instant_close(),
    );

    registry.register(TagDefinition::new("list").with_synonyms(&[
        "ordered-list",
        "olist",
        "unordered-list",
        "ulist",
    ]));
    registry.register(TagDefinition::new("*"));

    Arc::new(registry)
});
