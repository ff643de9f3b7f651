//! Bookmark forest store
//!
//! In-memory forest of bookmark trees with the structural primitives
//! (insert/edit/remove/seed). The primitives only manage structure;
//! the rules enforced when a user commits an add or edit live in
//! [`validate_commit`] and run before any primitive is called.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{BookmarkNode, OutlineError};

/// Ordered forest of bookmark trees for one document session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkForest {
    roots: Vec<BookmarkNode>,
}

impl BookmarkForest {
    /// Create an empty forest
    pub fn new() -> Self {
        Self { roots: Vec::new() }
    }

    /// Root bookmarks in insertion order
    pub fn roots(&self) -> &[BookmarkNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of bookmarks across all trees
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(BookmarkNode::subtree_size).sum()
    }

    /// Append a new root bookmark; always succeeds
    pub fn insert_root(&mut self, title: impl Into<String>, page: u32) -> BookmarkNode {
        let node = BookmarkNode::new(title, page);
        let created = node.clone();
        self.roots.push(node);
        created
    }

    /// Append a new bookmark under the identified parent
    pub fn insert_child(
        &mut self,
        parent_id: Uuid,
        title: impl Into<String>,
        page: u32,
    ) -> Result<BookmarkNode, OutlineError> {
        let parent = self
            .find_mut(parent_id)
            .ok_or(OutlineError::NodeNotFound(parent_id))?;
        let node = BookmarkNode::new(title, page);
        let created = node.clone();
        parent.children.push(node);
        Ok(created)
    }

    /// Replace title and page of the identified bookmark
    ///
    /// The node's id and children are untouched. Returns the updated node.
    pub fn edit(
        &mut self,
        id: Uuid,
        title: impl Into<String>,
        page: u32,
    ) -> Result<BookmarkNode, OutlineError> {
        let node = self.find_mut(id).ok_or(OutlineError::NodeNotFound(id))?;
        node.title = title.into();
        node.page = Some(page);
        Ok(node.clone())
    }

    /// Detach the identified bookmark together with its whole subtree
    ///
    /// Descendants are not promoted; they leave with their parent.
    /// Returns the detached subtree.
    pub fn remove(&mut self, id: Uuid) -> Result<BookmarkNode, OutlineError> {
        Self::detach(&mut self.roots, id).ok_or(OutlineError::NodeNotFound(id))
    }

    /// Look up a bookmark by id
    pub fn find(&self, id: Uuid) -> Option<&BookmarkNode> {
        Self::find_in(&self.roots, id)
    }

    /// Bulk-seed the forest from reconciled import nodes
    ///
    /// Only an empty forest accepts a seed; a non-empty forest is left
    /// exactly as it was. Returns the number of seeded nodes.
    pub fn seed(&mut self, nodes: Vec<BookmarkNode>) -> Result<usize, OutlineError> {
        if !self.roots.is_empty() {
            return Err(OutlineError::NotEmpty);
        }
        let count = nodes.iter().map(BookmarkNode::subtree_size).sum();
        self.roots = nodes;
        Ok(count)
    }

    fn find_mut(&mut self, id: Uuid) -> Option<&mut BookmarkNode> {
        Self::find_in_mut(&mut self.roots, id)
    }

    // Depth-first pre-order; ids are unique, so the first match is the
    // only match.
    fn find_in(nodes: &[BookmarkNode], id: Uuid) -> Option<&BookmarkNode> {
        for node in nodes {
            if node.id == id {
                return Some(node);
            }
            if let Some(found) = Self::find_in(&node.children, id) {
                return Some(found);
            }
        }
        None
    }

    fn find_in_mut(nodes: &mut [BookmarkNode], id: Uuid) -> Option<&mut BookmarkNode> {
        for node in nodes {
            if node.id == id {
                return Some(node);
            }
            if let Some(found) = Self::find_in_mut(&mut node.children, id) {
                return Some(found);
            }
        }
        None
    }

    fn detach(nodes: &mut Vec<BookmarkNode>, id: Uuid) -> Option<BookmarkNode> {
        for index in 0..nodes.len() {
            if nodes[index].id == id {
                return Some(nodes.remove(index));
            }
            if let Some(found) = Self::detach(&mut nodes[index].children, id) {
                return Some(found);
            }
        }
        None
    }
}

/// Validation applied when committing an add or edit
///
/// Returns the trimmed title and the checked 1-based page. Rejections
/// carry a human-readable reason and happen before any structural
/// primitive runs, so the forest is never half-updated.
pub fn validate_commit(
    title: &str,
    page: i64,
    page_count: Option<u32>,
) -> Result<(String, u32), OutlineError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(OutlineError::EmptyTitle);
    }

    if page < 1 || page > i64::from(u32::MAX) {
        return Err(OutlineError::InvalidPage(page));
    }
    let page = page as u32;

    if let Some(page_count) = page_count {
        if page > page_count {
            return Err(OutlineError::PageOutOfRange { page, page_count });
        }
    }

    Ok((title.to_string(), page))
}

// ============================================================================
// Tests
// ============================================================================
