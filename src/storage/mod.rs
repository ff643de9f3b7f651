//! Storage module for uploaded documents
//!
//! One flat directory of PDF files, keyed by session ID.

mod disk;

pub use disk::{DiskStore, StorageError};
