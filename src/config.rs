//! Configuration management for Marcador Server

use std::env;
use std::path::PathBuf;

use crate::session::{DEFAULT_CLEANUP_INTERVAL_SECS, DEFAULT_SESSION_TTL_MINUTES};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub upload: UploadConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory uploaded PDFs are stored in
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long an editing session stays alive
    pub ttl_minutes: i64,
    /// How often the cleanup task sweeps expired sessions
    pub cleanup_interval_secs: u64,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Maximum accepted upload size in megabytes
    pub max_upload_size_mb: usize,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub ollama_url: String,
    pub ollama_model: String,
    pub default_language: String,
}

impl UploadConfig {
    /// Maximum accepted upload size in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_size_mb * 1024 * 1024
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("./data"),
            },
            session: SessionConfig {
                ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
                cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL_SECS,
            },
            upload: UploadConfig {
                max_upload_size_mb: 100,
            },
            ocr: OcrConfig {
                ollama_url: "http://localhost:11434".to_string(),
                ollama_model: "llava".to_string(),
                default_language: "eng".to_string(),
            },
        }
    }
}

impl Config {
    /// Build the configuration from environment variables
    ///
    /// Every variable has a default, so a bare environment works.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            storage: StorageConfig {
                data_dir: env::var("DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.data_dir),
            },
            session: SessionConfig {
                ttl_minutes: env::var("SESSION_TTL_MINUTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.session.ttl_minutes),
                cleanup_interval_secs: env::var("SESSION_CLEANUP_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.session.cleanup_interval_secs),
            },
            upload: UploadConfig {
                max_upload_size_mb: env::var("MAX_UPLOAD_SIZE_MB")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.upload.max_upload_size_mb),
            },
            ocr: OcrConfig {
                ollama_url: env::var("OLLAMA_URL").unwrap_or(defaults.ocr.ollama_url),
                ollama_model: env::var("OLLAMA_MODEL").unwrap_or(defaults.ocr.ollama_model),
                default_language: env::var("OCR_DEFAULT_LANGUAGE")
                    .unwrap_or(defaults.ocr.default_language),
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
