//! Parsed-template and resolved-result caches.
//!
//! Two independent caches back the engine. Parsed template ASTs live until
//! cleared: templates come from config files and chat formats, a small and
//! stable population. Resolved results are stamped with the game tick they
//! were produced on and expire by time only — providers never invalidate
//! entries explicitly.

use std::sync::Arc;

use const_fnv1a_hash::fnv1a_hash_str_64;
use dashmap::DashMap;

use crate::parser::{parse_template, Syntax, Template};

/// Hash a template string for use as a cache key.
pub(crate) fn template_hash(template: &str) -> u64 {
    fnv1a_hash_str_64(template)
}

/// Cache of parsed template ASTs keyed by template text hash.
#[derive(Default)]
pub(crate) struct TemplateCache {
    templates: DashMap<u64, Arc<Template>>,
}

impl TemplateCache {
    /// Look up a parsed template, parsing and caching on miss.
    pub(crate) fn get_or_parse(&self, template: &str, syntax: &Syntax) -> Arc<Template> {
        let hash = template_hash(template);
        if let Some(parsed) = self.templates.get(&hash) {
            return Arc::clone(parsed.value());
        }
        let parsed = Arc::new(parse_template(template, syntax));
        self.templates.insert(hash, Arc::clone(&parsed));
        parsed
    }

    pub(crate) fn clear(&self) {
        self.templates.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.templates.len()
    }
}

/// Key for one cached resolution: template text and context identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ResultKey {
    pub(crate) template: u64,
    pub(crate) context: u64,
}

struct ResultEntry {
    tick: u64,
    text: String,
}

/// Tick-stamped resolved strings.
#[derive(Default)]
pub(crate) struct ResultCache {
    entries: DashMap<ResultKey, ResultEntry>,
}

impl ResultCache {
    /// Fetch a still-valid entry: one produced fewer than `ttl` ticks ago.
    pub(crate) fn get(&self, key: &ResultKey, now: u64, ttl: u64) -> Option<String> {
        let entry = self.entries.get(key)?;
        if now.saturating_sub(entry.tick) < ttl {
            Some(entry.text.clone())
        } else {
            None
        }
    }

    pub(crate) fn insert(&self, key: ResultKey, now: u64, text: String) {
        self.entries.insert(key, ResultEntry { tick: now, text });
    }

    /// Drop entries whose validity window has passed.
    pub(crate) fn prune(&self, now: u64, ttl: u64) {
        self.entries
            .retain(|_, entry| now.saturating_sub(entry.tick) < ttl);
    }

    pub(crate) fn clear(&self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
