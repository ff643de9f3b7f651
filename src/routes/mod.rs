//! Route modules for Marcador Server

pub mod bookmarks;
pub mod documents;
pub mod ocr;

use axum::{http::StatusCode, Json, Router};
use serde::Serialize;

use crate::config::Config;
use crate::session::SessionError;
use crate::state::AppState;
use crate::storage::StorageError;

// ============================================================================
// Error Response
// ============================================================================

/// Error response body shared by all API routes
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

impl ErrorResponse {
    pub(crate) fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub(crate) fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Map a session error onto the API error shape
pub(crate) fn session_error(e: SessionError) -> (StatusCode, Json<ErrorResponse>) {
    (e.status_code(), Json(ErrorResponse::new(e.to_string())))
}

/// Map a storage error onto the API error shape
pub(crate) fn storage_error(e: StorageError) -> (StatusCode, Json<ErrorResponse>) {
    (e.status_code(), Json(ErrorResponse::new(e.to_string())))
}

// ============================================================================
// Router
// ============================================================================

/// Build the API router mounted under /api/v1
pub fn api_router(config: &Config) -> Router<AppState> {
    let max_upload = config.upload.max_upload_bytes();

    Router::new()
        .nest(
            "/documents",
            documents::router(max_upload).merge(bookmarks::router()),
        )
        .nest("/ocr", ocr::router(max_upload))
}
