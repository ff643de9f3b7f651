//! Bookmark tree types
//!
//! Core data model for the editable outline: a forest of bookmark nodes,
//! each anchored to a 1-based page number.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A single bookmark in the outline tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    /// Opaque node identifier; unique within a session, never reused
    pub id: Uuid,
    /// Display text shown in the outline
    pub title: String,
    /// 1-based target page; `None` when no usable page is known
    pub page: Option<u32>,
    /// Ordered child bookmarks (owned, so the forest is a tree by construction)
    #[serde(default)]
    pub children: Vec<BookmarkNode>,
}

impl BookmarkNode {
    /// Create a leaf node with a fresh id
    pub fn new(title: impl Into<String>, page: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            page: Some(page),
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including the node itself
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(BookmarkNode::subtree_size)
            .sum::<usize>()
    }
}

/// Errors from bookmark tree operations
#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("Bookmark title cannot be empty")]
    EmptyTitle,

    #[error("Page must be a positive whole number (got {0})")]
    InvalidPage(i64),

    #[error("Page {page} is beyond the end of the document ({page_count} pages)")]
    PageOutOfRange { page: u32, page_count: u32 },

    #[error("Bookmark not found: {0}")]
    NodeNotFound(Uuid),

    #[error("Bookmarks already present; import would overwrite them")]
    NotEmpty,
}
