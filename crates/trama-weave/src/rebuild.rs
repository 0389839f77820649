use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use trama_path::{KeyPath, MAX_ARRAY_INDEX};
use trama_types::{integrity, Content, IntegrityReport, Language, TextEntry};

use crate::dedup::{dedupe, ResolvedEntry};
use crate::tree::assign;

/// Pseudo-page holding content shared across real pages (footer, nav).
pub const SHARED_PAGE_ID: &str = "__shared__";

/// Diagnostics recorded per original json key during reconstruction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetadata {
    pub available_languages: Vec<Language>,
    pub requested_language: Option<Language>,
    pub issues: Vec<String>,
    pub is_multilingual: bool,
}

/// A reconstructed page: the nested content tree plus per-key diagnostics.
///
/// This is what callers render and what the cache stores as a blob. It is
/// assembled fresh on every reconstruction and never written back to the row
/// store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub content: Value,
    pub language_metadata: BTreeMap<String, KeyMetadata>,
    pub is_multilingual: bool,
}

/// Rebuild one page's nested document from its flat rows.
///
/// Two modes:
///
/// - `language = None` (all-languages): every key emits an object holding
///   each required language's text (`""` where absent or null). A legacy
///   bare-string row puts its text under the first required language and
///   `""` under the rest -- a deliberate, limited fallback, not language
///   inference.
/// - `language = Some(l)` (single-language): every key emits the text for
///   `l` when the integrity check reports it usable, and a visual
///   placeholder otherwise.
///
/// Nesting: rows of the requested page nest under their cleaned key; rows of
/// `shared_page_id` nest one level deeper under that pseudo-page's name;
/// rows of any other page nest under their full original key (cross-page
/// leakage is tolerated, not filtered). Malformed rows, and rows whose key
/// carries an array index above `MAX_ARRAY_INDEX`, are skipped from the tree
/// but still appear in `language_metadata`. Stored rows bypass the edit
/// boundary, so the index ceiling is re-checked here before any array is
/// sparse-filled.
///
/// Zero rows is not an error: the result is an empty tree and empty metadata.
pub fn reconstruct(
    entries: Vec<TextEntry>,
    page_id: &str,
    shared_page_id: &str,
    language: Option<Language>,
) -> PageContent {
    let mut content = Value::Object(Map::new());
    let mut language_metadata = BTreeMap::new();

    for resolved in dedupe(entries) {
        let report = integrity::validate(&resolved.entry.content, &resolved.entry.row_id());
        language_metadata.insert(
            resolved.entry.json_key.clone(),
            KeyMetadata {
                available_languages: report.available.clone(),
                requested_language: language,
                issues: report.issue_strings(),
                is_multilingual: resolved.entry.content.is_localized(),
            },
        );

        let emitted = match language {
            None => all_languages_value(&resolved.entry.content),
            Some(l) => single_language_value(&resolved.entry.content, &report, l),
        };
        let Some(value) = emitted else {
            tracing::warn!(
                key = %resolved.entry.row_id(),
                found = resolved.entry.content.type_name(),
                "skipping malformed row"
            );
            continue;
        };

        let nest_key = nest_key(&resolved, page_id, shared_page_id);
        let path = match KeyPath::parse(&nest_key) {
            Ok(path) => path,
            Err(_) => {
                tracing::warn!(key = %resolved.entry.row_id(), "skipping row with empty key");
                continue;
            }
        };
        if let Some(index) = path.max_index().filter(|i| *i > MAX_ARRAY_INDEX) {
            tracing::warn!(
                key = %resolved.entry.row_id(),
                index,
                max = MAX_ARRAY_INDEX,
                "skipping row with out-of-range array index"
            );
            continue;
        }
        assign(&mut content, path.segments(), value);
    }

    PageContent {
        content,
        language_metadata,
        is_multilingual: language.is_none(),
    }
}

/// Where a row nests in the requested page's tree.
fn nest_key(resolved: &ResolvedEntry, page_id: &str, shared_page_id: &str) -> String {
    if resolved.entry.page_id == page_id {
        resolved.clean_key.clone()
    } else if resolved.entry.page_id == shared_page_id {
        format!("{shared_page_id}.{}", resolved.clean_key)
    } else {
        resolved.full_key.clone()
    }
}

fn all_languages_value(content: &Content) -> Option<Value> {
    match content {
        Content::Localized(map) => {
            let mut object = Map::new();
            for language in Language::REQUIRED {
                let value = match map.raw(language.code()) {
                    None | Some(Value::Null) => Value::String(String::new()),
                    Some(other) => other.clone(),
                };
                object.insert(language.code().to_string(), value);
            }
            Some(Value::Object(object))
        }
        Content::Legacy(text) => {
            let mut object = Map::new();
            for language in Language::REQUIRED {
                let value = if language == Language::first() {
                    text.clone()
                } else {
                    String::new()
                };
                object.insert(language.code().to_string(), Value::String(value));
            }
            Some(Value::Object(object))
        }
        Content::Malformed(_) => None,
    }
}

fn single_language_value(
    content: &Content,
    report: &IntegrityReport,
    language: Language,
) -> Option<Value> {
    let map = match content {
        Content::Localized(map) => map,
        Content::Legacy(_) => return Some(Value::String(language.placeholder().to_string())),
        Content::Malformed(_) => return None,
    };
    let text = map
        .text(language)
        .filter(|_| report.is_available(language))
        .map(str::to_string)
        .unwrap_or_else(|| language.placeholder().to_string());
    Some(Value::String(text))
}
