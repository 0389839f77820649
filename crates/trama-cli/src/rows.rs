//! Loading and saving row files.
//!
//! A rows file is a JSON array of `{pageId, jsonKey, content}` records, the
//! flat shape the content tables hold. The CLI loads one into an in-memory
//! store, works on it, and can write the merged rows back out.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trama_sdk::{Content, ContentService, ServiceConfig, TextEntry};
use trama_store::{EntryStore, InMemoryContentCache, InMemoryEntryStore};

/// One row in a rows file. `updatedAt` is optional on input; rows without it
/// are stamped at load time.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRecord {
    pub page_id: String,
    pub json_key: String,
    pub content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<RowRecord> for TextEntry {
    fn from(record: RowRecord) -> Self {
        let mut entry = TextEntry::new(
            &record.page_id,
            &record.json_key,
            Content::from_value(record.content),
        );
        if let Some(updated_at) = record.updated_at {
            entry.updated_at = updated_at;
        }
        entry
    }
}

impl From<&TextEntry> for RowRecord {
    fn from(entry: &TextEntry) -> Self {
        Self {
            page_id: entry.page_id.clone(),
            json_key: entry.json_key.clone(),
            content: entry.content.to_value(),
            updated_at: Some(entry.updated_at),
        }
    }
}

pub fn load_rows(path: &Path) -> anyhow::Result<Vec<TextEntry>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading rows file {}", path.display()))?;
    let records: Vec<RowRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing rows file {}", path.display()))?;
    Ok(records.into_iter().map(TextEntry::from).collect())
}

pub fn save_rows(path: &Path, entries: &[TextEntry]) -> anyhow::Result<()> {
    let records: Vec<RowRecord> = entries.iter().map(RowRecord::from).collect();
    let contents = serde_json::to_string_pretty(&records)?;
    fs::write(path, contents).with_context(|| format!("writing rows file {}", path.display()))
}

/// Load a rows file into a fresh in-memory store and wrap it in a service.
///
/// Returns the concrete store alongside the service so callers can dump the
/// rows back out after edits.
pub fn open_service(path: &Path) -> anyhow::Result<(Arc<InMemoryEntryStore>, ContentService)> {
    let store = Arc::new(InMemoryEntryStore::new());
    for entry in load_rows(path)? {
        store.upsert(&entry)?;
    }
    let service = ContentService::new(
        store.clone(),
        Arc::new(InMemoryContentCache::new()),
        ServiceConfig::default(),
    );
    Ok((store, service))
}

/// Every row in the store, in page order.
pub fn all_rows(store: &dyn EntryStore) -> anyhow::Result<Vec<TextEntry>> {
    let mut rows = Vec::new();
    for page in store.list_pages()? {
        rows.extend(store.fetch_page(&page.page_id)?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_error_names_the_path() {
        let error = load_rows(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(error.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn rows_roundtrip_with_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        let entries = vec![TextEntry::new(
            "home",
            "title",
            Content::from_value(json!({"pt-BR": "a", "en-US": "b"})),
        )];

        save_rows(&path, &entries).unwrap();
        let back = load_rows(&path).unwrap();

        assert_eq!(back.len(), 1);
        assert_eq!(back[0].page_id, "home");
        assert_eq!(back[0].content, entries[0].content);
        assert_eq!(back[0].updated_at, entries[0].updated_at);
    }

    #[test]
    fn rows_without_timestamp_are_stamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        fs::write(
            &path,
            r#"[{"pageId": "home", "jsonKey": "title", "content": {"pt-BR": "x"}}]"#,
        )
        .unwrap();

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows[0].json_key, "title");
        assert!(rows[0].content.is_localized());
    }

    #[test]
    fn open_service_seeds_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        let entries = vec![
            TextEntry::new("home", "a", Content::from_value(json!({"pt-BR": "1"}))),
            TextEntry::new("home", "b", Content::from_value(json!({"pt-BR": "2"}))),
        ];
        save_rows(&path, &entries).unwrap();

        let (store, service) = open_service(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(service.pages().unwrap().len(), 1);
        assert_eq!(all_rows(store.as_ref()).unwrap().len(), 2);
    }
}
