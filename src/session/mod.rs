//! Document Session Module
//!
//! Tracks one editing session per uploaded PDF:
//! - In-memory session registry keyed by UUID
//! - Single-writer bookmark operations behind one write lock
//! - TTL-based expiry with a background cleanup sweep
//!
//! Session Flow:
//! 1. Upload creates a session holding the document metadata and an empty forest
//! 2. Bookmark operations validate and mutate the forest under the session lock
//! 3. Download takes a snapshot; the live session keeps editing independently
//! 4. Expired sessions are swept together with their stored files

pub mod manager;
pub mod types;

pub use manager::SessionManager;
pub use types::*;
