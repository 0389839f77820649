use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use trama_sdk::ContentService;

use crate::handler;

/// Build the axum router with all content endpoints.
pub fn build_router(service: Arc<ContentService>, enable_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/v1/pages", get(handler::list_pages_handler))
        .route("/v1/pages/:page_id", get(handler::get_page_handler))
        .route("/v1/pages/:page_id/edits", post(handler::update_page_handler))
        .route("/v1/pages/:page_id/deletes", post(handler::delete_entries_handler))
        .route("/v1/pages/:page_id/integrity", get(handler::page_integrity_handler))
        .with_state(service)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    router
}
