use serde::{Deserialize, Serialize};
use trama_store::EntryStore;
use trama_types::{integrity, Content, ContentHash, IntegrityReport, Language, TextEntry};

use crate::legacy::reconcile_legacy;
use crate::merge::{merge_languages, EditValues, MergedField};
use crate::observer::WriteObserver;

/// One field's validated edit within a batch.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldEdit {
    pub json_key: String,
    pub values: EditValues,
}

/// Outcome class of one field write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateStatus {
    /// Merge completed; the row was persisted, or nothing had changed.
    Success,
    /// The persist itself failed.
    Failed,
    /// Processing failed before the persist could be attempted.
    Exception,
}

/// Per-field record in the batch's update log.
///
/// `old_hash == new_hash` on a [`UpdateStatus::Success`] entry means the
/// write was a no-op: nothing was persisted and no version moved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLogEntry {
    pub key: String,
    pub status: UpdateStatus,
    pub old_hash: Option<ContentHash>,
    pub new_hash: Option<ContentHash>,
    pub is_new_record: bool,
    pub sent_languages: Vec<Language>,
    pub preserved_languages: Vec<Language>,
    pub intentionally_cleared_languages: Vec<Language>,
    pub integrity_valid: bool,
    pub integrity_issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpdateLogEntry {
    /// A successful write that changed nothing.
    pub fn is_noop(&self) -> bool {
        self.status == UpdateStatus::Success && self.old_hash == self.new_hash
    }

    fn exception(key: &str, sent: Vec<Language>, is_new_record: bool, error: String) -> Self {
        Self {
            key: key.to_string(),
            status: UpdateStatus::Exception,
            old_hash: None,
            new_hash: None,
            is_new_record,
            sent_languages: sent,
            preserved_languages: Vec::new(),
            intentionally_cleared_languages: Vec::new(),
            integrity_valid: false,
            integrity_issues: Vec::new(),
            error: Some(error),
        }
    }

    fn merged(
        key: &str,
        status: UpdateStatus,
        field: &MergedField,
        new_hash: ContentHash,
        report: &IntegrityReport,
        error: Option<String>,
    ) -> Self {
        Self {
            key: key.to_string(),
            status,
            old_hash: Some(field.old_hash),
            new_hash: Some(new_hash),
            is_new_record: field.is_new_record,
            sent_languages: field.sent_languages.clone(),
            preserved_languages: field.preserved_languages.clone(),
            intentionally_cleared_languages: field.intentionally_cleared.clone(),
            integrity_valid: report.is_valid(),
            integrity_issues: report.issue_strings(),
            error,
        }
    }
}

/// Result of applying one edit batch to one page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// Fields whose row was actually persisted (no-ops excluded).
    pub updated_count: usize,
    pub update_log: Vec<UpdateLogEntry>,
}

/// Apply a batch of field edits to a page.
///
/// Fields are processed strictly in order: field N+1 starts only after field
/// N finished its merge, persist, and legacy cleanup. One field's failure is
/// recorded in its log entry and never aborts the rest of the batch.
pub fn apply_edits(
    store: &dyn EntryStore,
    observer: &dyn WriteObserver,
    page_id: &str,
    edits: &[FieldEdit],
) -> BatchOutcome {
    let mut update_log = Vec::with_capacity(edits.len());
    let mut updated_count = 0;

    for edit in edits {
        let entry = apply_field(store, observer, page_id, edit);
        if entry.status == UpdateStatus::Success && !entry.is_noop() {
            updated_count += 1;
        }
        update_log.push(entry);
    }

    tracing::info!(
        page = page_id,
        fields = edits.len(),
        updated = updated_count,
        "edit batch applied"
    );
    BatchOutcome { updated_count, update_log }
}

fn apply_field(
    store: &dyn EntryStore,
    observer: &dyn WriteObserver,
    page_id: &str,
    edit: &FieldEdit,
) -> UpdateLogEntry {
    let label = format!("{page_id}:{}", edit.json_key);
    let sent: Vec<Language> = edit.values.keys().copied().collect();

    let existing = match store.fetch(page_id, &edit.json_key) {
        Ok(row) => row,
        Err(error) => {
            tracing::error!(key = %label, %error, "fetch failed, field abandoned");
            return UpdateLogEntry::exception(&edit.json_key, sent, false, error.to_string());
        }
    };

    let field = match merge_languages(existing.as_ref().map(|row| &row.content), &edit.values) {
        Ok(field) => field,
        Err(error) => {
            tracing::error!(key = %label, %error, "merge failed, field abandoned");
            return UpdateLogEntry::exception(
                &edit.json_key,
                sent,
                existing.is_none(),
                error.to_string(),
            );
        }
    };

    if field.is_noop() {
        tracing::debug!(key = %label, hash = %field.new_hash.short_hex(), "content unchanged, write skipped");
        let report = integrity::validate(&Content::Localized(field.merged.clone()), &label);
        return UpdateLogEntry::merged(
            &edit.json_key,
            UpdateStatus::Success,
            &field,
            field.new_hash,
            &report,
            None,
        );
    }

    let row = TextEntry::new(page_id, &edit.json_key, Content::Localized(field.merged.clone()));
    if let Err(error) = store.upsert(&row) {
        tracing::error!(key = %label, %error, "persist failed");
        let report = integrity::validate(&row.content, &label);
        return UpdateLogEntry::merged(
            &edit.json_key,
            UpdateStatus::Failed,
            &field,
            field.new_hash,
            &report,
            Some(error.to_string()),
        );
    }
    observer.on_persisted(page_id, &edit.json_key);

    // The legacy sibling may enrich the row we just wrote; the log reports
    // the hash and integrity of whatever actually ended up stored.
    let outcome = reconcile_legacy(store, observer, page_id, &edit.json_key, &field.merged);
    let mut new_hash = field.new_hash;
    let final_map = match outcome.enriched {
        Some(enriched) => {
            match ContentHash::of_map(&enriched) {
                Ok(hash) => new_hash = hash,
                Err(error) => {
                    tracing::warn!(key = %label, %error, "failed to rehash enriched map")
                }
            }
            enriched
        }
        None => field.merged.clone(),
    };

    let report = integrity::validate(&Content::Localized(final_map), &label);
    UpdateLogEntry::merged(
        &edit.json_key,
        UpdateStatus::Success,
        &field,
        new_hash,
        &report,
        None,
    )
}
