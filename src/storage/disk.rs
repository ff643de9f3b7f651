//! Disk-backed document store

use std::path::{Path, PathBuf};

use uuid::Uuid;

// ============================================================================
// Error Types
// ============================================================================

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Stored document not found: {0}")]
    NotFound(Uuid),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ============================================================================
// Disk Store
// ============================================================================

/// Stores uploaded PDFs as `<session id>.pdf` under one directory
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Get the directory the store writes into
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{id}.pdf"))
    }

    /// Write the document bytes for a session
    pub async fn save(&self, id: Uuid, data: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(id);
        tokio::fs::write(&path, data).await?;

        tracing::debug!(session_id = %id, bytes = data.len(), "Stored document");
        Ok(())
    }

    /// Read the document bytes for a session
    pub async fn load(&self, id: Uuid) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(id);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the document for a session; missing files are not an error
    pub async fn remove(&self, id: Uuid) -> Result<(), StorageError> {
        let path = self.path_for(id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
