//! Localized dialog strings
//!
//! Tables are nested maps addressed with dotted keys such as
//! `buttons.cancel`. Lookups never fail: a key missing from the requested
//! language is looked up again in English, and if English lacks it too the
//! key itself is returned.

mod source;

pub use source::{BuiltinLocales, DirectoryLocales, LocaleSource};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Language every lookup falls back to
pub const FALLBACK_LANGUAGE: &str = "en";

/// A node in a locale table: either a string or a nested group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocaleNode {
    Text(String),
    Group(BTreeMap<String, LocaleNode>),
}

/// Strings for a single language, grouped by category
/// (`defaults`, `buttons`, `titles`, `messages`, `timeout`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleTable {
    root: BTreeMap<String, LocaleNode>,
}

impl LocaleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from its JSON representation
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Walk the table along a dotted key.
    ///
    /// Returns `None` when a segment is missing or the key names a group
    /// rather than a string.
    pub fn get(&self, dotted_key: &str) -> Option<&str> {
        let mut segments = dotted_key.split('.');
        let mut node = self.root.get(segments.next()?)?;

        for segment in segments {
            match node {
                LocaleNode::Group(children) => node = children.get(segment)?,
                LocaleNode::Text(_) => return None,
            }
        }

        match node {
            LocaleNode::Text(text) => Some(text),
            LocaleNode::Group(_) => None,
        }
    }

    /// Insert a string at a dotted key, creating groups along the way
    pub fn insert(&mut self, dotted_key: &str, value: impl Into<String>) {
        let mut segments: Vec<&str> = dotted_key.split('.').collect();
        let Some(leaf) = segments.pop() else {
            return;
        };

        let mut map = &mut self.root;
        for segment in segments {
            let node = map
                .entry(segment.to_string())
                .or_insert_with(|| LocaleNode::Group(BTreeMap::new()));
            if matches!(node, LocaleNode::Text(_)) {
                *node = LocaleNode::Group(BTreeMap::new());
            }
            let LocaleNode::Group(children) = node else {
                return;
            };
            map = children;
        }

        map.insert(leaf.to_string(), LocaleNode::Text(value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

/// Normalize a language code: trimmed, lowercase, region suffix dropped
/// (`tr-TR` and `tr_TR` both become `tr`).
pub fn normalize_language(code: &str) -> String {
    let code = code.trim();
    let primary = code.split(['-', '_']).next().unwrap_or(code);
    let primary = primary.to_ascii_lowercase();

    if primary.is_empty() {
        FALLBACK_LANGUAGE.to_string()
    } else {
        primary
    }
}

/// Per-controller cache of loaded locale tables.
///
/// The built-in English table backs every lookup from construction on. A
/// source that ships its own English table replaces it once
/// `load_language("en")` runs; keys it lacks still come from the built-in
/// table.
pub struct LocaleResolver {
    cache: RwLock<HashMap<String, Arc<LocaleTable>>>,
    builtin_english: LocaleTable,
    source: Arc<dyn LocaleSource>,
}

impl LocaleResolver {
    pub fn new(source: Arc<dyn LocaleSource>) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            builtin_english: BuiltinLocales::english(),
            source,
        }
    }

    /// Look up `dotted_key` for `language`, falling back to English and then
    /// to the key itself
    pub fn resolve(&self, language: &str, dotted_key: &str) -> String {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);

        cache
            .get(language)
            .and_then(|table| table.get(dotted_key))
            // Loaded English first, then the compiled-in copy
            .or_else(|| {
                cache
                    .get(FALLBACK_LANGUAGE)
                    .and_then(|table| table.get(dotted_key))
            })
            .or_else(|| self.builtin_english.get(dotted_key))
            .unwrap_or(dotted_key)
            .to_string()
    }

    /// Resolve a key and substitute `{name}` placeholders from `args`
    pub fn format(&self, language: &str, dotted_key: &str, args: &[(&str, &str)]) -> String {
        interpolate(&self.resolve(language, dotted_key), args)
    }

    /// Whether a table for `language` was loaded from the source
    pub fn is_loaded(&self, language: &str) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(language)
    }

    /// Load a language into the cache.
    ///
    /// Idempotent. If the source cannot provide the table, the cache stays
    /// as it was and lookups keep falling back to English.
    pub async fn load_language(&self, language: &str) {
        if self.is_loaded(language) {
            return;
        }

        if let Ok(table) = self.source.fetch(language).await {
            debug!("Loaded locale table for '{}'", language);
            self.cache
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(language.to_string())
                .or_insert_with(|| Arc::new(table));
        }
    }

    /// Load `language` together with the source's English table, which
    /// lookups fall back to
    pub async fn load_with_fallback(&self, language: &str) {
        self.load_language(FALLBACK_LANGUAGE).await;
        if language != FALLBACK_LANGUAGE {
            self.load_language(language).await;
        }
    }
}

/// Single-pass `{name}` substitution; unknown placeholders are kept as-is
fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };

        let name = &after[..end];
        match args.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}
