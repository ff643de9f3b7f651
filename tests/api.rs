//! HTTP API integration tests.
//!
//! Drives the full router with in-memory requests: upload a PDF, edit
//! bookmarks, download the outlined file, and read it back with lopdf.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use tower::ServiceExt;
use uuid::Uuid;

use marcador_server::config::Config;
use marcador_server::routes;
use marcador_server::state::AppState;

// =============================================================================
// Test Harness
// =============================================================================

const BOUNDARY: &str = "X-MARCADOR-TEST-BOUNDARY";

/// Build the API router backed by a temporary storage directory.
///
/// The TempDir must be kept alive for the duration of the test.
fn test_app() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.storage.data_dir = dir.path().to_path_buf();

    let state = AppState::new(config.clone()).unwrap();
    let app = Router::new()
        .nest("/api/v1", routes::api_router(&config))
        .with_state(state);

    (dir, app)
}

/// Minimal valid PDF with the given number of empty pages.
fn sample_pdf(page_count: usize) -> Vec<u8> {
    use lopdf::{dictionary, Document, Object};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (0..page_count)
        .map(|_| {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            Object::Reference(page_id)
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Encode one file field as a multipart/form-data body.
fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(uri: &str, field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(
            field,
            filename,
            "application/octet-stream",
            data,
        )))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn json_body(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Upload a PDF and return the parsed upload response.
async fn upload_pdf(app: &Router, data: &[u8]) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/documents",
            "file",
            "sample.pdf",
            data,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

// =============================================================================
// Upload Tests
// =============================================================================

#[tokio::test]
async fn test_upload_creates_session() {
    let (_dir, app) = test_app();

    let uploaded = upload_pdf(&app, &sample_pdf(3)).await;

    assert!(uploaded["id"].as_str().is_some());
    assert_eq!(uploaded["fileName"], "sample.pdf");
    assert_eq!(uploaded["pageCount"], 3);
    assert_eq!(uploaded["title"], "sample");
    assert_eq!(uploaded["message"], "Document uploaded successfully");
}

#[tokio::test]
async fn test_upload_rejects_non_pdf() {
    let (_dir, app) = test_app();

    let response = app
        .oneshot(multipart_request(
            "/api/v1/documents",
            "file",
            "notes.txt",
            b"plain text, not a pdf",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_requires_file_field() {
    let (_dir, app) = test_app();

    let response = app
        .oneshot(multipart_request(
            "/api/v1/documents",
            "attachment",
            "sample.pdf",
            &sample_pdf(1),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("No file provided"));
}

// =============================================================================
// Session Tests
// =============================================================================

#[tokio::test]
async fn test_get_document_details() {
    let (_dir, app) = test_app();

    let uploaded = upload_pdf(&app, &sample_pdf(2)).await;
    let id = uploaded["id"].as_str().unwrap();

    let response = app
        .oneshot(get_request(&format!("/api/v1/documents/{id}")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let details = json_body(response).await;
    assert_eq!(details["fileName"], "sample.pdf");
    assert_eq!(details["pageCount"], 2);
    assert_eq!(details["bookmarkCount"], 0);
}

#[tokio::test]
async fn test_unknown_document_is_not_found() {
    let (_dir, app) = test_app();

    let response = app
        .oneshot(get_request(&format!("/api/v1/documents/{}", Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_document_closes_session() {
    let (_dir, app) = test_app();

    let uploaded = upload_pdf(&app, &sample_pdf(1)).await;
    let id = uploaded["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/v1/documents/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get_request(&format!("/api/v1/documents/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Bookmark Tests
// =============================================================================

#[tokio::test]
async fn test_bookmark_crud_flow() {
    let (_dir, app) = test_app();

    let uploaded = upload_pdf(&app, &sample_pdf(3)).await;
    let id = uploaded["id"].as_str().unwrap().to_string();
    let base = format!("/api/v1/documents/{id}/bookmarks");

    // Insert a root bookmark
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &base,
            &serde_json::json!({"title": "Part I", "page": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let root = json_body(response).await;
    let root_id = root["id"].as_str().unwrap().to_string();
    assert_eq!(root["page"], 1);

    // Insert a child under it
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("{base}/{root_id}/children"),
            &serde_json::json!({"title": "Chapter 1", "page": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let child = json_body(response).await;
    let child_id = child["id"].as_str().unwrap().to_string();

    // Listing shows the nested structure
    let response = app.clone().oneshot(get_request(&base)).await.unwrap();
    let listing = json_body(response).await;
    assert_eq!(listing["total"], 2);
    assert_eq!(listing["bookmarks"][0]["title"], "Part I");
    assert_eq!(listing["bookmarks"][0]["children"][0]["title"], "Chapter 1");

    // Edit keeps the id
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("{base}/{child_id}"),
            &serde_json::json!({"title": "Chapter One", "page": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let edited = json_body(response).await;
    assert_eq!(edited["id"].as_str().unwrap(), child_id);
    assert_eq!(edited["title"], "Chapter One");
    assert_eq!(edited["page"], 3);

    // Removing the root takes the child with it
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("{base}/{root_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let removal = json_body(response).await;
    assert_eq!(removal["removed"], 2);

    let response = app.oneshot(get_request(&base)).await.unwrap();
    let listing = json_body(response).await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn test_bookmark_validation_errors() {
    let (_dir, app) = test_app();

    let uploaded = upload_pdf(&app, &sample_pdf(3)).await;
    let id = uploaded["id"].as_str().unwrap().to_string();
    let base = format!("/api/v1/documents/{id}/bookmarks");

    // Page zero
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &base,
            &serde_json::json!({"title": "Intro", "page": 0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Blank title
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &base,
            &serde_json::json!({"title": "   ", "page": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Page beyond the document
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &base,
            &serde_json::json!({"title": "Too far", "page": 4}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was committed
    let response = app.oneshot(get_request(&base)).await.unwrap();
    let listing = json_body(response).await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn test_bookmark_unknown_parent_is_not_found() {
    let (_dir, app) = test_app();

    let uploaded = upload_pdf(&app, &sample_pdf(1)).await;
    let id = uploaded["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(json_request(
            "POST",
            &format!(
                "/api/v1/documents/{id}/bookmarks/{}/children",
                Uuid::new_v4()
            ),
            &serde_json::json!({"title": "Orphan", "page": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Download Tests
// =============================================================================

#[tokio::test]
async fn test_download_embeds_outline() {
    let (_dir, app) = test_app();

    let uploaded = upload_pdf(&app, &sample_pdf(3)).await;
    let id = uploaded["id"].as_str().unwrap().to_string();
    let base = format!("/api/v1/documents/{id}/bookmarks");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &base,
            &serde_json::json!({"title": "Part I", "page": 1}),
        ))
        .await
        .unwrap();
    let root = json_body(response).await;
    let root_id = root["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(json_request(
            "POST",
            &format!("{base}/{root_id}/children"),
            &serde_json::json!({"title": "Chapter 1", "page": 2}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(get_request(&format!("/api/v1/documents/{id}/download")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("outlined-sample.pdf"));

    // Read the outline back out of the produced file
    let pdf = body_bytes(response).await;
    let doc = lopdf::Document::load_mem(&pdf).unwrap();

    let catalog_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    let catalog = doc.get_dictionary(catalog_id).unwrap();
    let outlines_id = catalog.get(b"Outlines").unwrap().as_reference().unwrap();
    let outlines = doc.get_dictionary(outlines_id).unwrap();

    let first_id = outlines.get(b"First").unwrap().as_reference().unwrap();
    let first = doc.get_dictionary(first_id).unwrap();
    match first.get(b"Title").unwrap() {
        lopdf::Object::String(bytes, _) => assert_eq!(bytes.as_slice(), b"Part I"),
        other => panic!("unexpected title object: {:?}", other),
    }

    let child_id = first.get(b"First").unwrap().as_reference().unwrap();
    let child = doc.get_dictionary(child_id).unwrap();
    match child.get(b"Title").unwrap() {
        lopdf::Object::String(bytes, _) => assert_eq!(bytes.as_slice(), b"Chapter 1"),
        other => panic!("unexpected title object: {:?}", other),
    }
}

#[tokio::test]
async fn test_download_without_bookmarks_returns_plain_pdf() {
    let (_dir, app) = test_app();

    let uploaded = upload_pdf(&app, &sample_pdf(2)).await;
    let id = uploaded["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(get_request(&format!("/api/v1/documents/{id}/download")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let pdf = body_bytes(response).await;
    let doc = lopdf::Document::load_mem(&pdf).unwrap();

    let catalog_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    let catalog = doc.get_dictionary(catalog_id).unwrap();
    assert!(catalog.get(b"Outlines").is_err());
}

// =============================================================================
// Import Tests
// =============================================================================

#[tokio::test]
async fn test_import_reads_embedded_outline() {
    let (_dir, app) = test_app();

    // Give the fixture an outline first
    let outlined = marcador_server::pdf::embed_outline(
        &sample_pdf(3),
        "1||Part I\n2|-|Chapter 1\n3|-|Chapter 2",
    )
    .unwrap();

    let uploaded = upload_pdf(&app, &outlined).await;
    let id = uploaded["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(empty_request(
            "POST",
            &format!("/api/v1/documents/{id}/bookmarks/import"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let imported = json_body(response).await;
    assert_eq!(imported["imported"], 3);

    let response = app
        .oneshot(get_request(&format!("/api/v1/documents/{id}/bookmarks")))
        .await
        .unwrap();
    let listing = json_body(response).await;
    assert_eq!(listing["total"], 3);
    assert_eq!(listing["bookmarks"][0]["title"], "Part I");
    assert_eq!(listing["bookmarks"][0]["page"], 1);
    assert_eq!(listing["bookmarks"][0]["children"][0]["title"], "Chapter 1");
    assert_eq!(listing["bookmarks"][0]["children"][1]["title"], "Chapter 2");
    assert_eq!(listing["bookmarks"][0]["children"][1]["page"], 3);
}

#[tokio::test]
async fn test_import_without_outline_imports_nothing() {
    let (_dir, app) = test_app();

    let uploaded = upload_pdf(&app, &sample_pdf(2)).await;
    let id = uploaded["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(empty_request(
            "POST",
            &format!("/api/v1/documents/{id}/bookmarks/import"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let imported = json_body(response).await;
    assert_eq!(imported["imported"], 0);
}

#[tokio::test]
async fn test_import_conflicts_with_existing_bookmarks() {
    let (_dir, app) = test_app();

    let outlined =
        marcador_server::pdf::embed_outline(&sample_pdf(2), "1||Existing outline").unwrap();
    let uploaded = upload_pdf(&app, &outlined).await;
    let id = uploaded["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/documents/{id}/bookmarks"),
            &serde_json::json!({"title": "Manual entry", "page": 1}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(empty_request(
            "POST",
            &format!("/api/v1/documents/{id}/bookmarks/import"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// =============================================================================
// OCR Tests
// =============================================================================

#[tokio::test]
async fn test_ocr_rejects_non_image_payload() {
    let (_dir, app) = test_app();

    let response = app
        .oneshot(multipart_request(
            "/api/v1/ocr",
            "image",
            "scan.png",
            b"this is not an image",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ocr_requires_image_field() {
    let (_dir, app) = test_app();

    let response = app
        .oneshot(multipart_request(
            "/api/v1/ocr",
            "attachment",
            "scan.png",
            b"ignored",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ocr_providers_endpoint() {
    let (_dir, app) = test_app();

    let response = app
        .oneshot(get_request("/api/v1/ocr/providers"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["providers"].is_array());
}
