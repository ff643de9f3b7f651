//! Marcador Server Library
//!
//! This crate exposes the server internals for integration tests and
//! benchmarks. The server binary is in main.rs.
//!
//! # Modules
//!
//! - `outline`: Bookmark forest, validation, and outline serialization
//! - `pdf`: PDF parsing and outline embedding via lopdf
//! - `session`: Per-document editing sessions with TTL expiry
//! - `routes`: HTTP API surface

pub mod config;
pub mod ocr;
pub mod outline;
pub mod pdf;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
