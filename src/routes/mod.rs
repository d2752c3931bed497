//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the layout API and health check under a single Axum
//! router. The editor's static front-end is served from the configured
//! directory as the fallback when that directory exists.

pub mod layout;

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::state::AppState;

/// API routes without static assets.
pub fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/boxes", get(layout::get_latest).post(layout::save))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Full application: API routes plus the static front-end at `/`.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let router = api_routes(state);
    let router = if static_dir.is_dir() {
        info!(dir = %static_dir.display(), "serving static assets");
        router.fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
    } else {
        warn!(dir = %static_dir.display(), "static directory missing; serving API only");
        router
    };
    router
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
