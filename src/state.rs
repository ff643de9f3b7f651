//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::ocr::{OcrProvider, OcrService, OcrServiceConfig};
use crate::session::SessionManager;
use crate::storage::{DiskStore, StorageError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pub config: Config,
    pub sessions: SessionManager,
    pub store: DiskStore,
    pub ocr: OcrService,
}

impl AppState {
    /// Create a new application state
    ///
    /// Fails if the storage directory cannot be created.
    pub fn new(config: Config) -> Result<Self, StorageError> {
        let store = DiskStore::new(&config.storage.data_dir)?;
        let sessions = SessionManager::new(config.session.ttl_minutes);
        let ocr = OcrService::new(OcrServiceConfig {
            providers: vec![OcrProvider::Tesseract, OcrProvider::Ollama],
            ollama_url: config.ocr.ollama_url.clone(),
            ollama_model: config.ocr.ollama_model.clone(),
            default_language: config.ocr.default_language.clone(),
        });

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                sessions,
                store,
                ocr,
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the session manager
    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    /// Get the document store
    pub fn store(&self) -> &DiskStore {
        &self.inner.store
    }

    /// Get the OCR service
    pub fn ocr(&self) -> &OcrService {
        &self.inner.ocr
    }
}
