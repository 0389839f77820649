use trama_store::EntryStore;
use trama_types::{Content, LanguageMap, TextEntry};

use crate::observer::WriteObserver;

/// What the reconciler did about a field's duplicate-prefixed sibling.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegacyOutcome {
    /// A legacy row existed for the field.
    pub found: bool,
    /// Language codes copied from the legacy row into the canonical one.
    pub merged_codes: Vec<String>,
    /// The legacy row was deleted.
    pub deleted: bool,
    /// The canonical map after enrichment, when a re-write happened.
    pub enriched: Option<LanguageMap>,
}

/// Clean up the duplicate-prefixed sibling of a just-persisted field.
///
/// The legacy key is `"<page_id>.<json_key>"`. If such a row exists, any
/// language code it carries that the canonical map lacks is copied over and
/// the canonical row re-persisted; only then is the legacy row deleted.
/// Write-before-delete is mandatory: if the enrichment write fails, the
/// legacy row stays. If the delete fails, the canonical row keeps the
/// enrichment and the legacy row is retried on the next write.
///
/// Every uncertainty fails safe: on a lookup error or a non-map legacy row,
/// cleanup is skipped and nothing is deleted.
pub fn reconcile_legacy(
    store: &dyn EntryStore,
    observer: &dyn WriteObserver,
    page_id: &str,
    json_key: &str,
    canonical: &LanguageMap,
) -> LegacyOutcome {
    let legacy_key = format!("{page_id}.{json_key}");

    let row = match store.fetch(page_id, &legacy_key) {
        Ok(Some(row)) => row,
        Ok(None) => return LegacyOutcome::default(),
        Err(error) => {
            tracing::warn!(
                page = page_id,
                key = legacy_key,
                %error,
                "legacy lookup failed, skipping cleanup"
            );
            return LegacyOutcome::default();
        }
    };

    let legacy_map = match row.content.as_localized() {
        Some(map) => map,
        None => {
            tracing::warn!(
                page = page_id,
                key = legacy_key,
                found = row.content.type_name(),
                "legacy row is not a language map, leaving it in place"
            );
            return LegacyOutcome { found: true, ..LegacyOutcome::default() };
        }
    };

    let only_in_legacy: Vec<(String, serde_json::Value)> = legacy_map
        .iter()
        .filter(|(code, _)| canonical.raw(code).is_none())
        .map(|(code, value)| (code.to_string(), value.clone()))
        .collect();

    if only_in_legacy.is_empty() {
        // Nothing to save; the legacy row is strictly redundant.
        let deleted = delete_legacy(store, observer, page_id, &legacy_key);
        return LegacyOutcome { found: true, deleted, ..LegacyOutcome::default() };
    }

    let mut enriched = canonical.clone();
    for (code, value) in &only_in_legacy {
        enriched.insert_raw(code.clone(), value.clone());
    }

    let entry = TextEntry::new(page_id, json_key, Content::Localized(enriched.clone()));
    if let Err(error) = store.upsert(&entry) {
        tracing::warn!(
            page = page_id,
            key = json_key,
            %error,
            "enrichment write failed, keeping legacy row"
        );
        return LegacyOutcome { found: true, ..LegacyOutcome::default() };
    }
    observer.on_persisted(page_id, json_key);

    let merged_codes: Vec<String> = only_in_legacy.into_iter().map(|(code, _)| code).collect();
    tracing::info!(
        page = page_id,
        key = json_key,
        codes = ?merged_codes,
        "canonical row enriched from legacy sibling"
    );

    let deleted = delete_legacy(store, observer, page_id, &legacy_key);
    LegacyOutcome { found: true, merged_codes, deleted, enriched: Some(enriched) }
}

fn delete_legacy(
    store: &dyn EntryStore,
    observer: &dyn WriteObserver,
    page_id: &str,
    legacy_key: &str,
) -> bool {
    match store.delete(page_id, legacy_key) {
        Ok(existed) => {
            if existed {
                observer.on_deleted(page_id, legacy_key);
                tracing::info!(page = page_id, key = legacy_key, "legacy row deleted");
            }
            existed
        }
        Err(error) => {
            tracing::warn!(
                page = page_id,
                key = legacy_key,
                %error,
                "legacy delete failed, row left for the next write"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{entry, RecordingObserver};
    use serde_json::json;
    use trama_store::InMemoryEntryStore;
    use trama_types::Language;

    fn map(value: serde_json::Value) -> LanguageMap {
        match Content::from_value(value) {
            Content::Localized(map) => map,
            other => panic!("expected language map, got {other:?}"),
        }
    }

    #[test]
    fn no_legacy_row_is_a_noop() {
        let store = InMemoryEntryStore::new();
        let observer = RecordingObserver::default();
        store
            .upsert(&entry("home", "field", json!({"pt-BR": "x", "en-US": "y"})))
            .unwrap();

        let outcome = reconcile_legacy(
            &store,
            &observer,
            "home",
            "field",
            &map(json!({"pt-BR": "x", "en-US": "y"})),
        );

        assert_eq!(outcome, LegacyOutcome::default());
        assert!(observer.events().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn redundant_legacy_row_is_deleted_without_rewrite() {
        let store = InMemoryEntryStore::new();
        let observer = RecordingObserver::default();
        store
            .upsert(&entry("home", "home.field", json!({"pt-BR": "old"})))
            .unwrap();

        let outcome = reconcile_legacy(
            &store,
            &observer,
            "home",
            "field",
            &map(json!({"pt-BR": "x", "en-US": "y"})),
        );

        assert!(outcome.found);
        assert!(outcome.deleted);
        assert!(outcome.merged_codes.is_empty());
        assert!(outcome.enriched.is_none());
        assert!(store.fetch("home", "home.field").unwrap().is_none());
        assert_eq!(observer.events(), vec!["delete home:home.field"]);
    }

    #[test]
    fn legacy_only_languages_are_saved_before_delete() {
        let store = InMemoryEntryStore::new();
        let observer = RecordingObserver::default();
        store
            .upsert(&entry("home", "home.field", json!({"en-US": "hello", "pt-BR": "x"})))
            .unwrap();

        // The canonical row only carries pt-BR.
        let outcome = reconcile_legacy(
            &store,
            &observer,
            "home",
            "field",
            &map(json!({"pt-BR": "novo"})),
        );

        assert!(outcome.found);
        assert!(outcome.deleted);
        assert_eq!(outcome.merged_codes, vec!["en-US"]);

        let canonical = store.fetch("home", "field").unwrap().expect("canonical row");
        let stored = canonical.content.as_localized().unwrap();
        assert_eq!(stored.text(Language::PtBr), Some("novo"));
        assert_eq!(stored.text(Language::EnUs), Some("hello"));

        // Write happens before delete.
        assert_eq!(
            observer.events(),
            vec!["persist home:field", "delete home:home.field"]
        );
    }

    #[test]
    fn failed_delete_never_loses_enrichment() {
        let store = InMemoryEntryStore::new();
        let observer = RecordingObserver::default();
        store
            .upsert(&entry("home", "home.field", json!({"en-US": "hello"})))
            .unwrap();

        store.fail_next_deletes(1);
        let outcome = reconcile_legacy(
            &store,
            &observer,
            "home",
            "field",
            &map(json!({"pt-BR": "novo"})),
        );

        assert!(outcome.found);
        assert!(!outcome.deleted);
        assert_eq!(outcome.merged_codes, vec!["en-US"]);

        // Canonical row holds the rescued language; legacy row survives.
        let canonical = store.fetch("home", "field").unwrap().unwrap();
        assert_eq!(
            canonical.content.as_localized().unwrap().text(Language::EnUs),
            Some("hello")
        );
        assert!(store.fetch("home", "home.field").unwrap().is_some());
    }

    #[test]
    fn failed_enrichment_write_keeps_legacy_row() {
        let store = InMemoryEntryStore::new();
        let observer = RecordingObserver::default();
        store
            .upsert(&entry("home", "home.field", json!({"en-US": "hello"})))
            .unwrap();

        store.fail_next_upserts(1);
        let outcome = reconcile_legacy(
            &store,
            &observer,
            "home",
            "field",
            &map(json!({"pt-BR": "novo"})),
        );

        assert!(outcome.found);
        assert!(!outcome.deleted);
        assert!(outcome.merged_codes.is_empty());
        assert!(store.fetch("home", "home.field").unwrap().is_some());
        assert!(observer.events().is_empty());
    }

    #[test]
    fn lookup_error_skips_cleanup_entirely() {
        let store = InMemoryEntryStore::new();
        let observer = RecordingObserver::default();
        store
            .upsert(&entry("home", "home.field", json!({"en-US": "hello"})))
            .unwrap();

        store.fail_next_fetches(1);
        let outcome = reconcile_legacy(
            &store,
            &observer,
            "home",
            "field",
            &map(json!({"pt-BR": "novo"})),
        );

        assert_eq!(outcome, LegacyOutcome::default());
        assert!(store.fetch("home", "home.field").unwrap().is_some());
    }

    #[test]
    fn non_map_legacy_row_is_left_in_place() {
        let store = InMemoryEntryStore::new();
        let observer = RecordingObserver::default();
        store
            .upsert(&entry("home", "home.field", json!("bare string")))
            .unwrap();

        let outcome = reconcile_legacy(
            &store,
            &observer,
            "home",
            "field",
            &map(json!({"pt-BR": "x"})),
        );

        assert!(outcome.found);
        assert!(!outcome.deleted);
        assert!(store.fetch("home", "home.field").unwrap().is_some());
    }

    #[test]
    fn stray_codes_are_rescued_too() {
        let store = InMemoryEntryStore::new();
        let observer = RecordingObserver::default();
        store
            .upsert(&entry("home", "home.field", json!({"fr-FR": "bonjour"})))
            .unwrap();

        let outcome = reconcile_legacy(
            &store,
            &observer,
            "home",
            "field",
            &map(json!({"pt-BR": "x", "en-US": "y"})),
        );

        assert_eq!(outcome.merged_codes, vec!["fr-FR"]);
        let canonical = store.fetch("home", "field").unwrap().unwrap();
        assert_eq!(
            canonical.content.as_localized().unwrap().raw("fr-FR"),
            Some(&json!("bonjour"))
        );
    }
}
