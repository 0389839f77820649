use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};
use crate::traits::ContentCache;

/// One cache entry: the blob plus its tombstone.
///
/// `invalidated_at` is the tombstone. Invalidation stamps it instead of
/// removing the entry, so a slot can be inspected after the fact and a
/// late-arriving reader can never observe pre-invalidation content as fresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSlot {
    pub blob: Vec<u8>,
    pub stored_at: DateTime<Utc>,
    pub invalidated_at: Option<DateTime<Utc>>,
}

impl CacheSlot {
    fn fresh(blob: Vec<u8>) -> Self {
        Self { blob, stored_at: Utc::now(), invalidated_at: None }
    }

    /// A tombstoned slot reads as a miss.
    pub fn is_live(&self) -> bool {
        self.invalidated_at.is_none()
    }
}

/// In-memory, `HashMap`-based content cache.
///
/// Intended for tests and embedding; a production deployment would put an
/// external blob cache behind the same [`ContentCache`] trait. The
/// `fail_next_*` knobs inject one backend failure into the next matching
/// operation, for exercising cache-degradation paths.
pub struct InMemoryContentCache {
    slots: RwLock<HashMap<String, CacheSlot>>,
    get_faults: AtomicUsize,
    put_faults: AtomicUsize,
    invalidate_faults: AtomicUsize,
}

impl InMemoryContentCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            get_faults: AtomicUsize::new(0),
            put_faults: AtomicUsize::new(0),
            invalidate_faults: AtomicUsize::new(0),
        }
    }

    /// Number of slots physically present, tombstoned or not.
    pub fn len(&self) -> usize {
        self.slots.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no slot is physically present.
    pub fn is_empty(&self) -> bool {
        self.slots.read().expect("lock poisoned").is_empty()
    }

    /// Whether a key is present but tombstoned.
    pub fn is_tombstoned(&self, key: &str) -> bool {
        self.slots
            .read()
            .expect("lock poisoned")
            .get(key)
            .is_some_and(|slot| !slot.is_live())
    }

    /// Drop every slot.
    pub fn clear(&self) {
        self.slots.write().expect("lock poisoned").clear();
    }

    /// Fail the next `n` gets.
    pub fn fail_next_gets(&self, n: usize) {
        self.get_faults.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` puts.
    pub fn fail_next_puts(&self, n: usize) {
        self.put_faults.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` invalidations.
    pub fn fail_next_invalidations(&self, n: usize) {
        self.invalidate_faults.store(n, Ordering::SeqCst);
    }

    fn take_fault(counter: &AtomicUsize, op: &str) -> CacheResult<()> {
        let armed = counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if armed {
            Err(CacheError::Backend(format!("injected {op} failure")))
        } else {
            Ok(())
        }
    }
}

impl Default for InMemoryContentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentCache for InMemoryContentCache {
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        Self::take_fault(&self.get_faults, "get")?;
        let slots = self.slots.read().expect("lock poisoned");
        Ok(slots
            .get(key)
            .filter(|slot| slot.is_live())
            .map(|slot| slot.blob.clone()))
    }

    fn put(&self, key: &str, blob: &[u8]) -> CacheResult<()> {
        Self::take_fault(&self.put_faults, "put")?;
        let mut slots = self.slots.write().expect("lock poisoned");
        slots.insert(key.to_string(), CacheSlot::fresh(blob.to_vec()));
        Ok(())
    }

    fn invalidate(&self, key: &str) -> CacheResult<()> {
        Self::take_fault(&self.invalidate_faults, "invalidate")?;
        let mut slots = self.slots.write().expect("lock poisoned");
        if let Some(slot) = slots.get_mut(key) {
            slot.invalidated_at = Some(Utc::now());
            tracing::debug!(key, "cache slot tombstoned");
        }
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryContentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryContentCache")
            .field("slot_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get() {
        let cache = InMemoryContentCache::new();
        cache.put("page:home:all", b"blob").unwrap();
        assert_eq!(cache.get("page:home:all").unwrap().as_deref(), Some(&b"blob"[..]));
    }

    #[test]
    fn miss_on_unknown_key() {
        let cache = InMemoryContentCache::new();
        assert!(cache.get("page:home:all").unwrap().is_none());
    }

    #[test]
    fn tombstone_reads_as_miss() {
        let cache = InMemoryContentCache::new();
        cache.put("page:home:all", b"blob").unwrap();
        cache.invalidate("page:home:all").unwrap();

        assert!(cache.get("page:home:all").unwrap().is_none());
        // The slot is still physically present.
        assert_eq!(cache.len(), 1);
        assert!(cache.is_tombstoned("page:home:all"));
    }

    #[test]
    fn put_clears_tombstone() {
        let cache = InMemoryContentCache::new();
        cache.put("k", b"old").unwrap();
        cache.invalidate("k").unwrap();
        cache.put("k", b"new").unwrap();

        assert_eq!(cache.get("k").unwrap().as_deref(), Some(&b"new"[..]));
        assert!(!cache.is_tombstoned("k"));
    }

    #[test]
    fn invalidating_missing_key_is_a_noop() {
        let cache = InMemoryContentCache::new();
        cache.invalidate("never-stored").unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn slot_serializes_with_tombstone_field() {
        let slot = CacheSlot::fresh(b"x".to_vec());
        let value = serde_json::to_value(&slot).unwrap();
        assert!(value.get("invalidatedAt").is_some());
        assert!(value["invalidatedAt"].is_null());
        assert!(value.get("storedAt").is_some());
    }

    // -----------------------------------------------------------------------
    // Fault injection
    // -----------------------------------------------------------------------

    #[test]
    fn injected_get_failure_fires_once() {
        let cache = InMemoryContentCache::new();
        cache.put("k", b"blob").unwrap();
        cache.fail_next_gets(1);
        assert!(cache.get("k").is_err());
        assert_eq!(cache.get("k").unwrap().as_deref(), Some(&b"blob"[..]));
    }

    #[test]
    fn injected_put_failure_stores_nothing() {
        let cache = InMemoryContentCache::new();
        cache.fail_next_puts(1);
        assert!(cache.put("k", b"blob").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn injected_invalidation_failure_leaves_slot_live() {
        let cache = InMemoryContentCache::new();
        cache.put("k", b"blob").unwrap();
        cache.fail_next_invalidations(1);
        assert!(cache.invalidate("k").is_err());
        assert!(!cache.is_tombstoned("k"));
    }
}
