use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trama_merge::{BatchOutcome, EditValues, FieldEdit, WriteObserver};
use trama_path::validate_json_key;
use trama_store::{ContentCache, EntryStore, PageSummary};
use trama_types::{integrity, json_type_name, Language};
use trama_weave::{dedupe, reconstruct, PageContent};

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::invalidate::{cache_key, CacheInvalidator};

/// Outcome class of one key in a bulk deletion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeleteStatus {
    Deleted,
    Missing,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteLogEntry {
    pub key: String,
    pub status: DeleteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a bulk deletion. Failures are per-key; the call itself succeeds
/// once its boundary validation passed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub deleted_count: usize,
    pub delete_log: Vec<DeleteLogEntry>,
}

/// Integrity findings for one stored key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyIntegrity {
    pub key: String,
    pub is_valid: bool,
    pub completeness: String,
    pub available_languages: Vec<Language>,
    pub issues: Vec<String>,
}

/// Integrity findings for a whole page's stored rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageIntegrity {
    pub page_id: String,
    pub checked: usize,
    pub valid: usize,
    pub keys: Vec<KeyIntegrity>,
}

/// Parse a raw `newText` object into typed edit values.
///
/// Rejects language codes outside the required set and non-string values;
/// both are fatal for the whole request, before any row is touched.
pub fn parse_edit_values(raw: &serde_json::Map<String, Value>) -> ServiceResult<EditValues> {
    let mut values = EditValues::new();
    for (code, value) in raw {
        let language: Language = code.parse()?;
        let text = value.as_str().ok_or_else(|| ServiceError::InvalidText {
            code: code.clone(),
            found: json_type_name(value),
        })?;
        values.insert(language, text.to_string());
    }
    Ok(values)
}

/// The content service: cached page reads, validated edit batches, bulk
/// deletion, and integrity reporting over one row store and one cache.
///
/// The cache client is constructed by the caller and passed in; the service
/// never reaches for a global handle. All writes funnel through the merge
/// engine with a [`CacheInvalidator`] observing, so every persisted row
/// tombstones its page's cached variants.
pub struct ContentService {
    store: Arc<dyn EntryStore>,
    cache: Arc<dyn ContentCache>,
    invalidator: CacheInvalidator,
    config: ServiceConfig,
}

impl ContentService {
    pub fn new(
        store: Arc<dyn EntryStore>,
        cache: Arc<dyn ContentCache>,
        config: ServiceConfig,
    ) -> Self {
        let invalidator = CacheInvalidator::new(cache.clone());
        Self { store, cache, invalidator, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Read-through reconstruction of one page.
    ///
    /// Serves from the cache when a live blob exists; otherwise rebuilds
    /// from the row store and caches the result. Cache trouble of any kind
    /// (backend error, corrupt blob) is treated as a miss, never as a
    /// failure: the row store is the source of truth.
    pub fn get_page(
        &self,
        page_id: &str,
        language: Option<Language>,
    ) -> ServiceResult<PageContent> {
        require_page_id(page_id)?;
        let key = cache_key(page_id, language);

        let cached = match self.cache.get(&key) {
            Ok(slot) => slot,
            Err(error) => {
                tracing::warn!(key, %error, "cache read failed, rebuilding");
                None
            }
        };
        if let Some(blob) = cached {
            match serde_json::from_slice(&blob) {
                Ok(page) => {
                    tracing::debug!(key, "cache hit");
                    return Ok(page);
                }
                Err(error) => tracing::warn!(key, %error, "corrupt cache blob, rebuilding"),
            }
        }

        let page = self.rebuild_page(page_id, language)?;
        match serde_json::to_vec(&page) {
            Ok(blob) => {
                if let Err(error) = self.cache.put(&key, &blob) {
                    tracing::warn!(key, %error, "cache put failed");
                }
            }
            Err(error) => tracing::warn!(key, %error, "page not cacheable"),
        }
        Ok(page)
    }

    /// Reconstruct one page straight from the row store, bypassing the cache.
    pub fn rebuild_page(
        &self,
        page_id: &str,
        language: Option<Language>,
    ) -> ServiceResult<PageContent> {
        require_page_id(page_id)?;
        let mut rows = self.store.fetch_page(page_id)?;
        if page_id != self.config.shared_page_id {
            rows.extend(self.store.fetch_page(&self.config.shared_page_id)?);
        }
        tracing::debug!(page = page_id, rows = rows.len(), "reconstructing page");
        Ok(reconstruct(rows, page_id, &self.config.shared_page_id, language))
    }

    /// Apply a validated batch of edits to one page.
    ///
    /// Boundary validation (page id, batch ceiling, key shape) fails the
    /// whole request. Past that point, per-field failures are recorded in
    /// the returned update log and the batch always completes.
    pub fn apply_edits(
        &self,
        page_id: &str,
        edits: Vec<FieldEdit>,
    ) -> ServiceResult<BatchOutcome> {
        require_page_id(page_id)?;
        if edits.len() > self.config.max_edits_per_call {
            return Err(ServiceError::TooManyEdits {
                count: edits.len(),
                max: self.config.max_edits_per_call,
            });
        }
        for edit in &edits {
            validate_json_key(&edit.json_key)?;
        }
        Ok(trama_merge::apply_edits(
            self.store.as_ref(),
            &self.invalidator,
            page_id,
            &edits,
        ))
    }

    /// Delete rows by key, sequentially, with per-key outcomes.
    pub fn delete_entries(
        &self,
        page_id: &str,
        json_keys: &[String],
    ) -> ServiceResult<DeleteOutcome> {
        require_page_id(page_id)?;
        if json_keys.len() > self.config.max_deletes_per_call {
            return Err(ServiceError::TooManyDeletes {
                count: json_keys.len(),
                max: self.config.max_deletes_per_call,
            });
        }
        for key in json_keys {
            validate_json_key(key)?;
        }

        let mut delete_log = Vec::with_capacity(json_keys.len());
        let mut deleted_count = 0;
        for key in json_keys {
            match self.store.delete(page_id, key) {
                Ok(true) => {
                    self.invalidator.on_deleted(page_id, key);
                    deleted_count += 1;
                    delete_log.push(DeleteLogEntry {
                        key: key.clone(),
                        status: DeleteStatus::Deleted,
                        error: None,
                    });
                }
                Ok(false) => delete_log.push(DeleteLogEntry {
                    key: key.clone(),
                    status: DeleteStatus::Missing,
                    error: None,
                }),
                Err(error) => {
                    tracing::error!(page = page_id, key, %error, "delete failed");
                    delete_log.push(DeleteLogEntry {
                        key: key.clone(),
                        status: DeleteStatus::Failed,
                        error: Some(error.to_string()),
                    });
                }
            }
        }

        tracing::info!(
            page = page_id,
            requested = json_keys.len(),
            deleted = deleted_count,
            "bulk delete finished"
        );
        Ok(DeleteOutcome { deleted_count, delete_log })
    }

    /// Integrity report over one page's stored rows (after deduplication).
    pub fn validate_page(&self, page_id: &str) -> ServiceResult<PageIntegrity> {
        require_page_id(page_id)?;
        let rows = self.store.fetch_page(page_id)?;

        let mut keys = Vec::new();
        let mut valid = 0;
        for resolved in dedupe(rows) {
            let report = integrity::validate(&resolved.entry.content, &resolved.entry.row_id());
            if report.is_valid() {
                valid += 1;
            }
            keys.push(KeyIntegrity {
                key: resolved.entry.json_key.clone(),
                is_valid: report.is_valid(),
                completeness: report.completeness().to_string(),
                available_languages: report.available.clone(),
                issues: report.issue_strings(),
            });
        }

        Ok(PageIntegrity { page_id: page_id.to_string(), checked: keys.len(), valid, keys })
    }

    /// Distinct pages in the store with their row counts.
    pub fn pages(&self) -> ServiceResult<Vec<PageSummary>> {
        Ok(self.store.list_pages()?)
    }
}

impl std::fmt::Debug for ContentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentService")
            .field("config", &self.config)
            .finish()
    }
}

fn require_page_id(page_id: &str) -> ServiceResult<()> {
    if page_id.trim().is_empty() {
        return Err(ServiceError::EmptyPageId);
    }
    Ok(())
}
