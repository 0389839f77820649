use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde_json::json;
use trama_sdk::{
    parse_edit_values, ContentService, FieldEdit, Language, PageContent, PageIntegrity,
    PageSummary, ServiceError,
};

use crate::error::ServerError;
use crate::wire::{DeleteRequest, DeleteResponse, PageQuery, UpdateRequest, UpdateResponse};

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "name": "trama-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Service metadata: the language set and the batch limits callers must
/// honor.
pub async fn info_handler(State(service): State<Arc<ContentService>>) -> Json<serde_json::Value> {
    let config = service.config();
    let languages: Vec<&str> = Language::REQUIRED.iter().map(Language::code).collect();
    Json(json!({
        "name": "trama-server",
        "version": env!("CARGO_PKG_VERSION"),
        "languages": languages,
        "sharedPageId": config.shared_page_id,
        "maxEditsPerCall": config.max_edits_per_call,
        "maxDeletesPerCall": config.max_deletes_per_call,
    }))
}

/// List every page present in the row store.
pub async fn list_pages_handler(
    State(service): State<Arc<ContentService>>,
) -> Result<Json<Vec<PageSummary>>, ServerError> {
    Ok(Json(service.pages()?))
}

/// Reconstruct one page, in one language or all of them.
pub async fn get_page_handler(
    State(service): State<Arc<ContentService>>,
    Path(page_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageContent>, ServerError> {
    let language = parse_language(query.language.as_deref())?;
    Ok(Json(service.get_page(&page_id, language)?))
}

/// Apply one edit batch to one page.
pub async fn update_page_handler(
    State(service): State<Arc<ContentService>>,
    Path(page_id): Path<String>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>, ServerError> {
    if let Some(language) = &request.language {
        tracing::debug!(page = page_id, language, "edit batch submitted");
    }

    let mut edits = Vec::with_capacity(request.edits.len());
    for (json_key, payload) in &request.edits {
        let values = parse_edit_values(&payload.new_text)?;
        edits.push(FieldEdit { json_key: json_key.clone(), values });
    }

    let outcome = service.apply_edits(&page_id, edits)?;
    Ok(Json(UpdateResponse {
        success: true,
        updated_count: outcome.updated_count,
        update_log: outcome.update_log,
    }))
}

/// Delete rows by key.
pub async fn delete_entries_handler(
    State(service): State<Arc<ContentService>>,
    Path(page_id): Path<String>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, ServerError> {
    let outcome = service.delete_entries(&page_id, &request.keys)?;
    Ok(Json(DeleteResponse {
        success: true,
        deleted_count: outcome.deleted_count,
        delete_log: outcome.delete_log,
    }))
}

/// Integrity report over one page's stored rows.
pub async fn page_integrity_handler(
    State(service): State<Arc<ContentService>>,
    Path(page_id): Path<String>,
) -> Result<Json<PageIntegrity>, ServerError> {
    Ok(Json(service.validate_page(&page_id)?))
}

/// Absent or `"all"` means all-languages reconstruction; anything else must
/// be a required language code.
fn parse_language(raw: Option<&str>) -> Result<Option<Language>, ServerError> {
    match raw {
        None => Ok(None),
        Some("all") => Ok(None),
        Some(code) => {
            let language = code.parse::<Language>().map_err(ServiceError::from)?;
            Ok(Some(language))
        }
    }
}
