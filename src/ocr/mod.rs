//! OCR Module
//!
//! Provides OCR (Optical Character Recognition) for uploaded images.
//!
//! Supports multiple backends:
//! - Tesseract (local CLI, probed at runtime)
//! - Ollama vision models (local LLM)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use marcador_server::ocr::{OcrService, OcrServiceConfig};
//!
//! let service = OcrService::new(OcrServiceConfig::default());
//!
//! // Check available providers
//! let providers = service.available_providers().await;
//!
//! // OCR an uploaded image
//! let png = service.prepare_image(&upload_bytes)?;
//! let result = service.recognize(&png, None, Some("eng")).await?;
//! ```

mod provider;
mod service;
mod types;

pub use provider::{OcrProviderTrait, OllamaProvider, TesseractProvider};
pub use service::{OcrService, OcrServiceConfig};
pub use types::{OcrError, OcrProvider, OcrResult};
