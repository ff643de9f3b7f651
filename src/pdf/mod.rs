//! PDF engine
//!
//! lopdf-backed document access: reading pages, metadata and the native
//! outline for import, and writing a fresh outline tree from a
//! serialized descriptor.

pub mod embedder;
pub mod parser;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use embedder::embed_outline;
pub use parser::PdfParser;
pub use types::PdfError;
