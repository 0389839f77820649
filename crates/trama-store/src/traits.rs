use serde::{Deserialize, Serialize};
use trama_types::TextEntry;

use crate::error::{CacheResult, StoreResult};

/// Row count for one page, as reported by [`EntryStore::list_pages`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub page_id: String,
    pub row_count: usize,
}

/// The flat row store holding every `(page_id, json_key)` content row.
///
/// All implementations must satisfy these invariants:
/// - `(page_id, json_key)` is the conflict target: `upsert` replaces the row
///   with the same pair and never creates a second one.
/// - Absence is not an error: `fetch` returns `Ok(None)` and `delete` returns
///   `Ok(false)` for rows that do not exist.
/// - Each call is its own atomic unit; no operation spans rows.
/// - Backend failures are propagated, never silently ignored.
pub trait EntryStore: Send + Sync {
    /// All rows stored under a page, ordered by `json_key`.
    fn fetch_page(&self, page_id: &str) -> StoreResult<Vec<TextEntry>>;

    /// One row by its identity. `Ok(None)` if the row does not exist.
    fn fetch(&self, page_id: &str, json_key: &str) -> StoreResult<Option<TextEntry>>;

    /// Insert or replace the row identified by `(entry.page_id, entry.json_key)`.
    fn upsert(&self, entry: &TextEntry) -> StoreResult<()>;

    /// Delete a row. Returns `true` if the row existed.
    fn delete(&self, page_id: &str, json_key: &str) -> StoreResult<bool>;

    /// Distinct pages with their row counts, ordered by `page_id`.
    fn list_pages(&self) -> StoreResult<Vec<PageSummary>>;
}

/// Read-through cache for reconstructed page blobs.
///
/// Entries carry a tombstone (`invalidated_at`); a tombstoned entry is a miss
/// even while physically present, so invalidation never races a concurrent
/// `put` into resurrecting stale content.
pub trait ContentCache: Send + Sync {
    /// The cached blob, or `None` on miss or tombstone.
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Store a fresh blob, clearing any tombstone on the key.
    fn put(&self, key: &str, blob: &[u8]) -> CacheResult<()>;

    /// Tombstone the key. No-op if the key is absent.
    fn invalidate(&self, key: &str) -> CacheResult<()>;
}
