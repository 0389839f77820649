use std::sync::Arc;

use trama_merge::WriteObserver;
use trama_store::ContentCache;
use trama_types::Language;

/// Cache key for one page/language reconstruction variant.
pub fn cache_key(page_id: &str, language: Option<Language>) -> String {
    match language {
        Some(language) => format!("page:{page_id}:{language}"),
        None => format!("page:{page_id}:all"),
    }
}

/// Every cache key a page's content can live under.
pub fn page_cache_keys(page_id: &str) -> Vec<String> {
    let mut keys = vec![cache_key(page_id, None)];
    keys.extend(Language::REQUIRED.iter().map(|l| cache_key(page_id, Some(*l))));
    keys
}

/// Observer that tombstones a page's cached variants whenever the engine
/// confirms a row change on that page.
///
/// Invalidation is best-effort: a cache backend failure is logged, never
/// propagated, since the row store already holds the new truth.
pub struct CacheInvalidator {
    cache: Arc<dyn ContentCache>,
}

impl CacheInvalidator {
    pub fn new(cache: Arc<dyn ContentCache>) -> Self {
        Self { cache }
    }

    fn invalidate_page(&self, page_id: &str) {
        for key in page_cache_keys(page_id) {
            if let Err(error) = self.cache.invalidate(&key) {
                tracing::warn!(key, %error, "cache invalidation failed");
            }
        }
    }
}

impl WriteObserver for CacheInvalidator {
    fn on_persisted(&self, page_id: &str, _json_key: &str) {
        self.invalidate_page(page_id);
    }

    fn on_deleted(&self, page_id: &str, _json_key: &str) {
        self.invalidate_page(page_id);
    }
}
