//! Route configuration and setup.

pub mod health;

use crate::constants::API_PREFIX;
use crate::handlers::{media_delete, media_download, media_upload};
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Request},
    routing::{get, post},
    Router,
};
use mediagate_core::Config;
use mediagate_infra::{get_request_id, request_id_middleware};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    build_router(state, config.max_upload_size_bytes())
}

/// Router with every route and layer, given an explicit body limit.
pub fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router<()> {
    let media_routes = Router::new()
        .route("/media", post(media_upload::upload_media))
        .route(
            "/media/{key}",
            get(media_download::download_media).delete(media_delete::delete_media),
        );

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let request_id = get_request_id(request).unwrap_or_default();
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    Router::new()
        .route("/health", get(health::health_check))
        .nest(API_PREFIX, media_routes)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(DefaultBodyLimit::disable())
        .layer(trace_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}
