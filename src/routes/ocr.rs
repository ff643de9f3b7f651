//! OCR API endpoints
//!
//! REST API for recognizing text in uploaded images:
//! - Run OCR on a posted image
//! - List the OCR providers available on this host
//!
//! Endpoints:
//! - POST /api/v1/ocr - OCR an uploaded image
//! - GET /api/v1/ocr/providers - List available providers

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::ocr::{OcrProvider, OcrResult};
use crate::state::AppState;

use super::ErrorResponse;

// ============================================================================
// Response Types
// ============================================================================

/// Response for available OCR providers
#[derive(Serialize)]
pub struct OcrProvidersResponse {
    pub providers: Vec<String>,
}

// ============================================================================
// Router
// ============================================================================

/// Create the OCR router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(recognize_image))
        .route("/providers", get(list_providers))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

// ============================================================================
// Handlers
// ============================================================================

/// Run OCR on an uploaded image
///
/// Accepts multipart form data with an `image` (or `file`) field plus
/// optional `provider` and `language` text fields.
async fn recognize_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<OcrResult>, (StatusCode, Json<ErrorResponse>)> {
    let mut image_data: Option<Vec<u8>> = None;
    let mut provider: Option<OcrProvider> = None;
    let mut language: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_details(
                "Failed to read upload",
                e.to_string(),
            )),
        )
    })? {
        match field.name().unwrap_or("") {
            "image" | "file" => {
                let data = field.bytes().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse::with_details(
                            "Failed to read image data",
                            e.to_string(),
                        )),
                    )
                })?;
                image_data = Some(data.to_vec());
            }
            "provider" => {
                let value = field.text().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse::with_details(
                            "Failed to read provider field",
                            e.to_string(),
                        )),
                    )
                })?;
                provider = Some(OcrProvider::parse(&value).ok_or_else(|| {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse::new(format!("Unknown OCR provider '{}'", value))),
                    )
                })?);
            }
            "language" => {
                language = Some(field.text().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse::with_details(
                            "Failed to read language field",
                            e.to_string(),
                        )),
                    )
                })?);
            }
            _ => {}
        }
    }

    let data = image_data.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "No image provided. Use field name 'image' or 'file'",
            )),
        )
    })?;

    // Non-image payloads are rejected here
    let png = state.ocr().prepare_image(&data).map_err(|e| {
        (e.status_code(), Json(ErrorResponse::new(e.to_string())))
    })?;

    let result = state
        .ocr()
        .recognize(&png, provider, language.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("OCR failed: {}", e);
            (
                e.status_code(),
                Json(ErrorResponse::with_details("OCR failed", e.to_string())),
            )
        })?;

    tracing::info!(
        "OCR completed using {:?} (confidence: {:.1}%)",
        result.provider,
        result.confidence
    );

    Ok(Json(result))
}

/// List available OCR providers
async fn list_providers(State(state): State<AppState>) -> Json<OcrProvidersResponse> {
    let providers = state.ocr().available_providers().await;

    let provider_names: Vec<String> = providers
        .into_iter()
        .map(|p| format!("{:?}", p).to_lowercase())
        .collect();

    Json(OcrProvidersResponse {
        providers: provider_names,
    })
}
