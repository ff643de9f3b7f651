//! Document API endpoints
//!
//! REST API for document sessions:
//! - Upload a PDF to open an editing session
//! - Get session details
//! - Delete a session and its stored file
//! - Download the PDF with the edited outline embedded
//!
//! Endpoints:
//! - POST /api/v1/documents - Upload a PDF
//! - GET /api/v1/documents/:id - Get session details
//! - DELETE /api/v1/documents/:id - Close the session
//! - GET /api/v1/documents/:id/download - Download with outline

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::outline;
use crate::pdf::{embed_outline, PdfParser};
use crate::state::AppState;

use super::{session_error, storage_error, ErrorResponse};

// ============================================================================
// Constants
// ============================================================================

/// Upper bound on outline embedding time during download
const EMBED_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Response Types
// ============================================================================

/// Upload response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: Uuid,
    pub file_name: String,
    pub title: String,
    pub page_count: u32,
    pub expires_at: DateTime<Utc>,
    pub message: String,
}

/// Session detail response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetailResponse {
    pub id: Uuid,
    pub file_name: String,
    pub title: String,
    pub page_count: u32,
    pub bookmark_count: usize,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Router
// ============================================================================

/// Create the documents router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(upload_document))
        .route("/:id", get(get_document).delete(delete_document))
        .route("/:id/download", get(download_document))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

// ============================================================================
// Handlers
// ============================================================================

/// Upload a PDF and open an editing session
async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, Json<ErrorResponse>)> {
    tracing::debug!("Starting document upload processing");

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_details(
                "Failed to read upload",
                e.to_string(),
            )),
        )
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" || name == "document" {
            let file_name = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "document.pdf".to_string());

            let data = field.bytes().await.map_err(|e| {
                tracing::error!("Failed to read file data: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::with_details(
                        "Failed to read file data",
                        e.to_string(),
                    )),
                )
            })?;

            tracing::debug!("Read {} bytes of file data", data.len());

            // Zero-page and unparsable files are rejected here
            let parser = PdfParser::from_bytes(&data).map_err(|e| {
                (
                    e.status_code(),
                    Json(ErrorResponse::with_details("Not a usable PDF", e.to_string())),
                )
            })?;

            let page_count = parser.page_count();
            let title = parser.title().unwrap_or_else(|| title_from_file_name(&file_name));

            let session = state
                .sessions()
                .create_session(file_name, title, page_count)
                .await;

            if let Err(e) = state.store().save(session.id, &data).await {
                let _ = state.sessions().remove_session(session.id).await;
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::with_details(
                        "Failed to store document",
                        e.to_string(),
                    )),
                ));
            }

            return Ok(Json(UploadResponse {
                id: session.id,
                file_name: session.file_name,
                title: session.title,
                page_count: session.page_count,
                expires_at: session.expires_at,
                message: "Document uploaded successfully".to_string(),
            }));
        }
    }

    tracing::warn!("No file field found in multipart upload");
    Err((
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(
            "No file provided. Use field name 'file' or 'document'",
        )),
    ))
}

/// Get session details by ID
async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionDetailResponse>, (StatusCode, Json<ErrorResponse>)> {
    let session = state.sessions().get_session(id).await.map_err(session_error)?;

    Ok(Json(SessionDetailResponse {
        id: session.id,
        file_name: session.file_name,
        title: session.title,
        page_count: session.page_count,
        bookmark_count: session.forest.node_count(),
        created_at: session.created_at,
        expires_at: session.expires_at,
    }))
}

/// Close a session and delete its stored file
async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state.sessions().remove_session(id).await.map_err(session_error)?;

    if let Err(error) = state.store().remove(id).await {
        tracing::warn!(session_id = %id, %error, "Failed to remove stored document");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Download the PDF with the current bookmark forest embedded as its outline
///
/// The forest is snapshotted up front; edits made while the download is
/// running do not affect the produced file.
async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let session = state.sessions().get_session(id).await.map_err(session_error)?;
    let descriptor = outline::serialize(&session.forest);
    let data = state.store().load(id).await.map_err(storage_error)?;

    let embed = tokio::task::spawn_blocking(move || embed_outline(&data, &descriptor));
    let embedded = match tokio::time::timeout(
        std::time::Duration::from_secs(EMBED_TIMEOUT_SECS),
        embed,
    )
    .await
    {
        Ok(Ok(result)) => result.map_err(|e| {
            (
                e.status_code(),
                Json(ErrorResponse::with_details(
                    "Failed to embed outline",
                    e.to_string(),
                )),
            )
        })?,
        Ok(Err(join_error)) => {
            tracing::error!(session_id = %id, %join_error, "Outline embedding task failed");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Outline embedding task failed")),
            ));
        }
        Err(_) => {
            tracing::error!(session_id = %id, "Outline embedding timed out");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Outline embedding timed out")),
            ));
        }
    };

    tracing::info!(
        session_id = %id,
        bookmarks = session.forest.node_count(),
        bytes = embedded.len(),
        "Prepared outlined download"
    );

    let filename = format!("outlined-{}", session.file_name);
    let disposition = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        filename.replace(['"', '\r', '\n'], "_"),
        urlencoding::encode(&filename)
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(embedded))
        .unwrap();

    Ok(response)
}

// ============================================================================
// Helpers
// ============================================================================

/// Derive a title from the uploaded file name
fn title_from_file_name(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);

    if stem.trim().is_empty() {
        "Untitled document".to_string()
    } else {
        stem.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
