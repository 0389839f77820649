use std::collections::BTreeMap;

use trama_types::TextEntry;

/// A row with its key resolved against the duplicate-prefix convention.
///
/// An earlier storage convention wrote keys prefixed with their own page id
/// (`("home", "home.hero.title")` instead of `("home", "hero.title")`). Both
/// forms still exist in stored data. `clean_key` is the key with that prefix
/// stripped; `full_key` is `page_id.clean_key`, the logical field identity
/// rows are deduplicated on.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedEntry {
    pub entry: TextEntry,
    pub clean_key: String,
    pub full_key: String,
    pub had_prefix: bool,
}

impl ResolvedEntry {
    /// Resolve one row.
    pub fn resolve(entry: TextEntry) -> Self {
        let (clean_key, had_prefix) = strip_page_prefix(&entry.page_id, &entry.json_key);
        let full_key = format!("{}.{}", entry.page_id, clean_key);
        Self { entry, clean_key, full_key, had_prefix }
    }
}

/// Strip a `"<page_id>."` prefix from a json key, if present.
pub fn strip_page_prefix(page_id: &str, json_key: &str) -> (String, bool) {
    match json_key.strip_prefix(page_id).and_then(|rest| rest.strip_prefix('.')) {
        Some(stripped) => (stripped.to_string(), true),
        None => (json_key.to_string(), false),
    }
}

/// Collapse duplicate logical keys, preferring the unprefixed form.
///
/// Rows are grouped by `full_key`. When a prefixed and an unprefixed row
/// collide, the unprefixed row wins no matter which arrived first; a prefixed
/// row never replaces an unprefixed one. Output is ordered by `full_key`, so
/// the result is independent of input order.
pub fn dedupe(entries: Vec<TextEntry>) -> Vec<ResolvedEntry> {
    let mut kept: BTreeMap<String, ResolvedEntry> = BTreeMap::new();

    for entry in entries {
        let resolved = ResolvedEntry::resolve(entry);
        match kept.get(&resolved.full_key) {
            None => {
                kept.insert(resolved.full_key.clone(), resolved);
            }
            Some(existing) if existing.had_prefix && !resolved.had_prefix => {
                tracing::debug!(
                    full_key = %resolved.full_key,
                    dropped = %existing.entry.json_key,
                    "duplicate-prefixed row shadowed by clean row"
                );
                kept.insert(resolved.full_key.clone(), resolved);
            }
            Some(_) => {
                tracing::debug!(
                    full_key = %resolved.full_key,
                    dropped = %resolved.entry.json_key,
                    "duplicate row dropped"
                );
            }
        }
    }

    kept.into_values().collect()
}
