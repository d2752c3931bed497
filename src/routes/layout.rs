//! Layout API routes.
//!
//! Response bodies keep a `success` flag alongside the HTTP status because
//! the editor reads the flag, not the status, to decide whether to fall back
//! to its local cache.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::services::layout::LayoutDocument;
use crate::state::AppState;

pub const SOURCE_REMOTE: &str = "remote";
pub const SOURCE_DEFAULT: &str = "default";
pub const SOURCE_ERROR: &str = "error";

#[derive(Debug, Serialize, Deserialize)]
pub struct LoadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<LayoutDocument>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /api/boxes`: the latest stored layout.
pub async fn get_latest(State(state): State<AppState>) -> (StatusCode, Json<LoadResponse>) {
    match state.store.latest().await {
        Ok(Some(doc)) => (
            StatusCode::OK,
            Json(LoadResponse { success: true, data: Some(doc), source: SOURCE_REMOTE.into(), error: None }),
        ),
        Ok(None) => (
            StatusCode::OK,
            Json(LoadResponse {
                success: true,
                data: Some(LayoutDocument::default()),
                source: SOURCE_DEFAULT.into(),
                error: None,
            }),
        ),
        Err(e) => {
            error!(error = %e, code = e.error_code(), "layout read failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LoadResponse {
                    success: false,
                    data: None,
                    source: SOURCE_ERROR.into(),
                    error: Some("Failed to read data".into()),
                }),
            )
        }
    }
}

/// `POST /api/boxes`: append a layout as the new latest.
pub async fn save(State(state): State<AppState>, Json(doc): Json<LayoutDocument>) -> (StatusCode, Json<SaveResponse>) {
    match state.store.append(&doc).await {
        Ok(id) => {
            info!(id, boxes = doc.boxes.len(), "layout saved");
            (
                StatusCode::OK,
                Json(SaveResponse { success: true, message: Some("Data saved".into()), error: None }),
            )
        }
        Err(e) => {
            error!(error = %e, code = e.error_code(), "layout save failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveResponse { success: false, message: None, error: Some("Failed to save data".into()) }),
            )
        }
    }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
