//! PDF engine types

/// PDF engine error types
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("Failed to read PDF: {0}")]
    Parse(#[from] lopdf::Error),

    #[error("Document has no pages")]
    NoPages,

    #[error("Malformed outline descriptor at line {line}: {reason}")]
    BadDescriptor { line: usize, reason: String },
}

impl PdfError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::Parse(_) | Self::NoPages => StatusCode::BAD_REQUEST,
            Self::BadDescriptor { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}
