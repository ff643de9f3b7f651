//! Bookmark API endpoints
//!
//! REST API for editing the bookmark forest of a document session:
//! - List the current forest
//! - Insert root and child bookmarks
//! - Edit and remove bookmarks
//! - Import the outline already embedded in the uploaded PDF
//!
//! Endpoints:
//! - GET /api/v1/documents/:id/bookmarks - List bookmarks
//! - POST /api/v1/documents/:id/bookmarks - Insert a root bookmark
//! - POST /api/v1/documents/:id/bookmarks/import - Import the PDF outline
//! - PUT /api/v1/documents/:id/bookmarks/:node_id - Edit a bookmark
//! - DELETE /api/v1/documents/:id/bookmarks/:node_id - Remove a subtree
//! - POST /api/v1/documents/:id/bookmarks/:node_id/children - Insert a child

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::outline::{reconcile, BookmarkNode};
use crate::pdf::PdfParser;
use crate::state::AppState;

use super::{session_error, storage_error, ErrorResponse};

// ============================================================================
// Request / Response Types
// ============================================================================

/// A bookmark to insert or the new contents of an edited one
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRequest {
    pub title: String,
    pub page: i64,
}

/// Response for the bookmark listing
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkListResponse {
    pub bookmarks: Vec<BookmarkNode>,
    pub total: usize,
}

/// Response for a subtree removal
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResponse {
    pub removed: usize,
}

/// Response for an outline import
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub imported: usize,
}

// ============================================================================
// Router
// ============================================================================

/// Create the bookmarks router, merged into the documents router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/bookmarks", get(list_bookmarks).post(create_root))
        .route("/:id/bookmarks/import", post(import_outline))
        .route(
            "/:id/bookmarks/:node_id",
            put(update_bookmark).delete(delete_bookmark),
        )
        .route("/:id/bookmarks/:node_id/children", post(create_child))
}

// ============================================================================
// Handlers
// ============================================================================

/// List the bookmark forest of a session
async fn list_bookmarks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookmarkListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let session = state.sessions().get_session(id).await.map_err(session_error)?;

    let total = session.forest.node_count();
    Ok(Json(BookmarkListResponse {
        bookmarks: session.forest.roots().to_vec(),
        total,
    }))
}

/// Insert a bookmark at the root level
async fn create_root(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<BookmarkRequest>,
) -> Result<Json<BookmarkNode>, (StatusCode, Json<ErrorResponse>)> {
    let node = state
        .sessions()
        .insert_root(id, &request.title, request.page)
        .await
        .map_err(session_error)?;

    Ok(Json(node))
}

/// Insert a bookmark as the last child of an existing one
async fn create_child(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<BookmarkRequest>,
) -> Result<Json<BookmarkNode>, (StatusCode, Json<ErrorResponse>)> {
    let node = state
        .sessions()
        .insert_child(id, node_id, &request.title, request.page)
        .await
        .map_err(session_error)?;

    Ok(Json(node))
}

/// Rewrite the title and page of a bookmark
async fn update_bookmark(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<BookmarkRequest>,
) -> Result<Json<BookmarkNode>, (StatusCode, Json<ErrorResponse>)> {
    let node = state
        .sessions()
        .edit_bookmark(id, node_id, &request.title, request.page)
        .await
        .map_err(session_error)?;

    Ok(Json(node))
}

/// Remove a bookmark and its descendants
async fn delete_bookmark(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RemoveResponse>, (StatusCode, Json<ErrorResponse>)> {
    let removed = state
        .sessions()
        .remove_bookmark(id, node_id)
        .await
        .map_err(session_error)?;

    Ok(Json(RemoveResponse { removed }))
}

/// Import the outline embedded in the uploaded PDF
///
/// Only allowed while the forest is empty. Returns how many bookmarks
/// were imported; zero means the PDF carries no outline.
async fn import_outline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ImportResponse>, (StatusCode, Json<ErrorResponse>)> {
    let session = state.sessions().get_session(id).await.map_err(session_error)?;

    if !session.forest.is_empty() {
        return Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse::new(
                "Bookmarks already present; import would overwrite them",
            )),
        ));
    }

    let data = state.store().load(id).await.map_err(storage_error)?;

    // The file parsed at upload time, so failing now is a server problem
    let parser = PdfParser::from_bytes(&data).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::with_details(
                "Failed to re-read stored PDF",
                e.to_string(),
            )),
        )
    })?;

    let items = parser.existing_outline().unwrap_or_default();
    let nodes = reconcile(&items, &parser, session.page_count);

    let imported = state
        .sessions()
        .seed_bookmarks(id, nodes)
        .await
        .map_err(session_error)?;

    Ok(Json(ImportResponse { imported }))
}
