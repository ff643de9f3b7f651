//! Bookmark outline core
//!
//! The in-memory bookmark forest a session edits, its deterministic
//! serialization into the outline descriptor, and the reconciliation of
//! a document's native outline into fresh bookmarks.

pub mod import;
pub mod serializer;
pub mod store;
pub mod types;

pub use import::{reconcile, ImportDest, ImportItem, PageAnchor, PageResolver};
pub use serializer::serialize;
pub use store::{validate_commit, BookmarkForest};
pub use types::{BookmarkNode, OutlineError};
