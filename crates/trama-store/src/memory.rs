use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use trama_types::TextEntry;

use crate::error::{StoreError, StoreResult};
use crate::traits::{EntryStore, PageSummary};

/// In-memory, `BTreeMap`-based entry store.
///
/// Intended for tests and embedding. Rows are keyed by `(page_id, json_key)`
/// behind a `RwLock`; the ordered map makes `fetch_page` and `list_pages`
/// deterministic. The `fail_next_*` knobs inject one backend failure into the
/// next matching operation, for exercising the partial-failure paths.
pub struct InMemoryEntryStore {
    rows: RwLock<BTreeMap<(String, String), TextEntry>>,
    fetch_faults: AtomicUsize,
    upsert_faults: AtomicUsize,
    delete_faults: AtomicUsize,
}

impl InMemoryEntryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            fetch_faults: AtomicUsize::new(0),
            upsert_faults: AtomicUsize::new(0),
            delete_faults: AtomicUsize::new(0),
        }
    }

    /// Number of rows currently stored.
    pub fn len(&self) -> usize {
        self.rows.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.read().expect("lock poisoned").is_empty()
    }

    /// Remove all rows.
    pub fn clear(&self) {
        self.rows.write().expect("lock poisoned").clear();
    }

    /// Fail the next `n` fetches (both single-row and page fetches).
    pub fn fail_next_fetches(&self, n: usize) {
        self.fetch_faults.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` upserts.
    pub fn fail_next_upserts(&self, n: usize) {
        self.upsert_faults.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` deletes.
    pub fn fail_next_deletes(&self, n: usize) {
        self.delete_faults.store(n, Ordering::SeqCst);
    }

    fn take_fault(counter: &AtomicUsize, op: &str) -> StoreResult<()> {
        let armed = counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if armed {
            Err(StoreError::Backend(format!("injected {op} failure")))
        } else {
            Ok(())
        }
    }
}

impl Default for InMemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for InMemoryEntryStore {
    fn fetch_page(&self, page_id: &str) -> StoreResult<Vec<TextEntry>> {
        Self::take_fault(&self.fetch_faults, "fetch")?;
        let rows = self.rows.read().expect("lock poisoned");
        Ok(rows
            .range((page_id.to_string(), String::new())..)
            .take_while(|((page, _), _)| page == page_id)
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    fn fetch(&self, page_id: &str, json_key: &str) -> StoreResult<Option<TextEntry>> {
        Self::take_fault(&self.fetch_faults, "fetch")?;
        let rows = self.rows.read().expect("lock poisoned");
        Ok(rows
            .get(&(page_id.to_string(), json_key.to_string()))
            .cloned())
    }

    fn upsert(&self, entry: &TextEntry) -> StoreResult<()> {
        Self::take_fault(&self.upsert_faults, "upsert")?;
        let mut rows = self.rows.write().expect("lock poisoned");
        rows.insert(
            (entry.page_id.clone(), entry.json_key.clone()),
            entry.clone(),
        );
        Ok(())
    }

    fn delete(&self, page_id: &str, json_key: &str) -> StoreResult<bool> {
        Self::take_fault(&self.delete_faults, "delete")?;
        let mut rows = self.rows.write().expect("lock poisoned");
        Ok(rows
            .remove(&(page_id.to_string(), json_key.to_string()))
            .is_some())
    }

    fn list_pages(&self) -> StoreResult<Vec<PageSummary>> {
        let rows = self.rows.read().expect("lock poisoned");
        let mut summaries: Vec<PageSummary> = Vec::new();
        for (page_id, _) in rows.keys() {
            match summaries.last_mut() {
                Some(last) if &last.page_id == page_id => last.row_count += 1,
                _ => summaries.push(PageSummary { page_id: page_id.clone(), row_count: 1 }),
            }
        }
        Ok(summaries)
    }
}

impl std::fmt::Debug for InMemoryEntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryEntryStore")
            .field("row_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trama_types::Content;

    fn entry(page: &str, key: &str, text: &str) -> TextEntry {
        TextEntry::new(page, key, Content::from_value(json!({"pt-BR": text})))
    }

    // -----------------------------------------------------------------------
    // Row CRUD
    // -----------------------------------------------------------------------

    #[test]
    fn upsert_and_fetch() {
        let store = InMemoryEntryStore::new();
        store.upsert(&entry("home", "hero.title", "ola")).unwrap();

        let row = store.fetch("home", "hero.title").unwrap().expect("row");
        assert_eq!(row.page_id, "home");
        assert_eq!(row.json_key, "hero.title");
    }

    #[test]
    fn fetch_missing_returns_none() {
        let store = InMemoryEntryStore::new();
        assert!(store.fetch("home", "nope").unwrap().is_none());
    }

    #[test]
    fn upsert_replaces_on_conflict_target() {
        let store = InMemoryEntryStore::new();
        store.upsert(&entry("home", "title", "first")).unwrap();
        store.upsert(&entry("home", "title", "second")).unwrap();
        assert_eq!(store.len(), 1);

        let row = store.fetch("home", "title").unwrap().unwrap();
        assert_eq!(row.content.as_localized().unwrap().text(trama_types::Language::PtBr), Some("second"));
    }

    #[test]
    fn delete_reports_existence() {
        let store = InMemoryEntryStore::new();
        store.upsert(&entry("home", "title", "x")).unwrap();
        assert!(store.delete("home", "title").unwrap());
        assert!(!store.delete("home", "title").unwrap());
        assert!(store.fetch("home", "title").unwrap().is_none());
    }

    // -----------------------------------------------------------------------
    // Page queries
    // -----------------------------------------------------------------------

    #[test]
    fn fetch_page_returns_only_that_page() {
        let store = InMemoryEntryStore::new();
        store.upsert(&entry("home", "b", "1")).unwrap();
        store.upsert(&entry("home", "a", "2")).unwrap();
        store.upsert(&entry("about", "a", "3")).unwrap();

        let rows = store.fetch_page("home").unwrap();
        assert_eq!(rows.len(), 2);
        // Ordered by json_key.
        assert_eq!(rows[0].json_key, "a");
        assert_eq!(rows[1].json_key, "b");
    }

    #[test]
    fn fetch_page_of_unknown_page_is_empty() {
        let store = InMemoryEntryStore::new();
        store.upsert(&entry("home", "a", "1")).unwrap();
        assert!(store.fetch_page("missing").unwrap().is_empty());
    }

    #[test]
    fn page_prefix_does_not_bleed() {
        // "home" rows must not show up when fetching "hom".
        let store = InMemoryEntryStore::new();
        store.upsert(&entry("home", "a", "1")).unwrap();
        assert!(store.fetch_page("hom").unwrap().is_empty());
    }

    #[test]
    fn list_pages_counts_rows() {
        let store = InMemoryEntryStore::new();
        store.upsert(&entry("home", "a", "1")).unwrap();
        store.upsert(&entry("home", "b", "2")).unwrap();
        store.upsert(&entry("about", "a", "3")).unwrap();

        let pages = store.list_pages().unwrap();
        assert_eq!(
            pages,
            vec![
                PageSummary { page_id: "about".into(), row_count: 1 },
                PageSummary { page_id: "home".into(), row_count: 2 },
            ]
        );
    }

    // -----------------------------------------------------------------------
    // Fault injection
    // -----------------------------------------------------------------------

    #[test]
    fn injected_upsert_failure_fires_once() {
        let store = InMemoryEntryStore::new();
        store.fail_next_upserts(1);
        assert!(store.upsert(&entry("home", "a", "x")).is_err());
        assert!(store.upsert(&entry("home", "a", "x")).is_ok());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn injected_fetch_failure_covers_both_fetches() {
        let store = InMemoryEntryStore::new();
        store.fail_next_fetches(2);
        assert!(store.fetch("home", "a").is_err());
        assert!(store.fetch_page("home").is_err());
        assert!(store.fetch("home", "a").is_ok());
    }

    #[test]
    fn injected_delete_failure_leaves_row() {
        let store = InMemoryEntryStore::new();
        store.upsert(&entry("home", "a", "x")).unwrap();
        store.fail_next_deletes(1);
        assert!(store.delete("home", "a").is_err());
        assert!(store.fetch("home", "a").unwrap().is_some());
    }

    // -----------------------------------------------------------------------
    // Concurrent access
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_reads_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryEntryStore::new());
        store.upsert(&entry("home", "title", "shared")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    assert!(store.fetch("home", "title").unwrap().is_some());
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }
    }

    #[test]
    fn debug_format() {
        let store = InMemoryEntryStore::new();
        store.upsert(&entry("home", "a", "x")).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryEntryStore"));
        assert!(debug.contains("row_count"));
    }
}
