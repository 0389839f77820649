//! Request and response bodies for the REST surface.
//!
//! Edit payloads arrive stringly typed (`newText` is a raw JSON object) and
//! are converted to typed values at the handler boundary; nothing past the
//! handlers sees raw wire shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use trama_sdk::{DeleteLogEntry, UpdateLogEntry};

/// One field's payload in an edit batch.
///
/// `language` is the editor's active language and is advisory only; the
/// values actually written are the per-language entries of `new_text`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPayload {
    pub new_text: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Body of `POST /v1/pages/{page_id}/edits`.
///
/// Edits are keyed by `json_key`; the batch is applied sequentially in key
/// order.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub edits: BTreeMap<String, FieldPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// `success` is about the request itself; per-field outcomes live in
/// `update_log` and can still be failures.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub success: bool,
    pub updated_count: usize,
    pub update_log: Vec<UpdateLogEntry>,
}

/// Body of `POST /v1/pages/{page_id}/deletes`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub keys: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_count: usize,
    pub delete_log: Vec<DeleteLogEntry>,
}

/// Query string of `GET /v1/pages/{page_id}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub language: Option<String>,
}
