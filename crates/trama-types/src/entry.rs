use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::Content;

/// One stored content row: a page, a dotted key within the page, and the
/// classified content under that key.
///
/// The pair `(page_id, json_key)` identifies a row. The store enforces the
/// uniqueness; duplicates that predate enforcement are collapsed by the
/// deduplicator on read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEntry {
    pub page_id: String,
    pub json_key: String,
    pub content: Content,
    pub updated_at: DateTime<Utc>,
}

impl TextEntry {
    /// Create an entry stamped with the current time.
    pub fn new(
        page_id: impl Into<String>,
        json_key: impl Into<String>,
        content: Content,
    ) -> Self {
        Self {
            page_id: page_id.into(),
            json_key: json_key.into(),
            content,
            updated_at: Utc::now(),
        }
    }

    /// The composite row identity, used in logs and diagnostics.
    pub fn row_id(&self) -> String {
        format!("{}:{}", self.page_id, self.json_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_stamps_updated_at() {
        let before = Utc::now();
        let entry = TextEntry::new("home", "hero.title", Content::from_value(json!({})));
        assert!(entry.updated_at >= before);
        assert_eq!(entry.row_id(), "home:hero.title");
    }

    #[test]
    fn wire_format_is_camel_case() {
        let entry = TextEntry::new("home", "hero.title", Content::from_value(json!("x")));
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("pageId").is_some());
        assert!(value.get("jsonKey").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["content"], json!("x"));
    }

    #[test]
    fn deserializes_classified_content() {
        let entry: TextEntry = serde_json::from_value(json!({
            "pageId": "home",
            "jsonKey": "hero.title",
            "content": {"pt-BR": "ola"},
            "updatedAt": "2026-01-15T12:00:00Z",
        }))
        .unwrap();
        assert!(entry.content.is_localized());
    }
}
