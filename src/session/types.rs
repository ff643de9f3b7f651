//! Document session types

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::outline::{BookmarkForest, OutlineError};

// ============================================================================
// Constants
// ============================================================================

/// Default session lifetime: 2 hours
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 120;

/// Default sweep interval for the cleanup task: 5 minutes
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;

// ============================================================================
// Session Types
// ============================================================================

/// Editing session for one uploaded document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSession {
    /// Unique session ID, also the key for the stored file
    pub id: Uuid,

    /// File name the document was uploaded under
    pub file_name: String,

    /// Document title (PDF metadata when present, file name otherwise)
    pub title: String,

    /// Total page count of the document
    pub page_count: u32,

    /// The bookmark forest being edited
    pub forest: BookmarkForest,

    /// Session creation time
    pub created_at: DateTime<Utc>,

    /// Session expiry time
    pub expires_at: DateTime<Utc>,
}

impl DocumentSession {
    /// Create a new session for an uploaded document
    pub fn new(file_name: String, title: String, page_count: u32, ttl: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            file_name,
            title,
            page_count,
            forest: BookmarkForest::new(),
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Session error types
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(Uuid),

    #[error("Session expired: {0}")]
    Expired(Uuid),

    #[error(transparent)]
    Outline(#[from] OutlineError),
}

impl SessionError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Expired(_) => StatusCode::GONE,
            Self::Outline(OutlineError::NodeNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Outline(OutlineError::NotEmpty) => StatusCode::CONFLICT,
            Self::Outline(_) => StatusCode::BAD_REQUEST,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_empty() {
        let session = DocumentSession::new(
            "report.pdf".to_string(),
            "Report".to_string(),
            10,
            chrono::Duration::minutes(DEFAULT_SESSION_TTL_MINUTES),
        );

        assert_eq!(session.file_name, "report.pdf");
        assert_eq!(session.page_count, 10);
        assert!(session.forest.is_empty());
        assert!(!session.is_expired());
        assert!(session.expires_at > session.created_at);
    }

    #[test]
    fn test_negative_ttl_expires_immediately() {
        let session = DocumentSession::new(
            "a.pdf".to_string(),
            "A".to_string(),
            1,
            chrono::Duration::minutes(-1),
        );
        assert!(session.is_expired());
    }

    #[test]
    fn test_error_status_codes() {
        use axum::http::StatusCode;

        let id = Uuid::new_v4();
        assert_eq!(SessionError::NotFound(id).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(SessionError::Expired(id).status_code(), StatusCode::GONE);
        assert_eq!(
            SessionError::Outline(OutlineError::NotEmpty).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            SessionError::Outline(OutlineError::NodeNotFound(id)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SessionError::Outline(OutlineError::EmptyTitle).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
