//! Native outline import
//!
//! Maps a document's native outline (the import source) onto fresh
//! bookmark nodes. Resolution is best effort and per item: anything that
//! cannot be resolved still imports, with title "Untitled" and page 1.
//! Source order is preserved as-is; import never sorts.

use uuid::Uuid;

use super::types::BookmarkNode;

/// Fallback title for items without usable text
pub const UNTITLED: &str = "Untitled";
/// Fallback page when destination resolution fails
pub const FALLBACK_PAGE: u32 = 1;

/// Generation-qualified object number anchoring a destination to a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageAnchor(pub u32, pub u16);

/// Destination recorded on a native outline item
#[derive(Debug, Clone, PartialEq)]
pub enum ImportDest {
    /// Name that must be looked up in the document's named destinations
    Named(String),
    /// Explicit destination; the anchor identifies the target page
    Explicit(PageAnchor),
    /// No destination recorded
    Absent,
}

/// One item of a document's native outline
#[derive(Debug, Clone, PartialEq)]
pub struct ImportItem {
    pub title: Option<String>,
    pub dest: ImportDest,
    pub children: Vec<ImportItem>,
}

/// Document-side lookups needed to turn destinations into page numbers
pub trait PageResolver {
    /// Resolve a named destination to the page anchor it points at
    fn named_destination(&self, name: &str) -> Option<PageAnchor>;

    /// Map a page anchor to its 1-based page index
    fn page_index(&self, anchor: PageAnchor) -> Option<u32>;
}

/// Reconcile an import source into bookmark nodes
///
/// Every node gets a fresh id. A destination that fails to resolve at
/// any step, or resolves outside `1..=page_count`, falls back to page 1.
pub fn reconcile<R: PageResolver>(
    items: &[ImportItem],
    resolver: &R,
    page_count: u32,
) -> Vec<BookmarkNode> {
    items
        .iter()
        .map(|item| {
            let title = item
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(UNTITLED)
                .to_string();

            let page = resolve_dest(&item.dest, resolver)
                .filter(|page| (1..=page_count).contains(page))
                .unwrap_or(FALLBACK_PAGE);

            BookmarkNode {
                id: Uuid::new_v4(),
                title,
                page: Some(page),
                children: reconcile(&item.children, resolver, page_count),
            }
        })
        .collect()
}

fn resolve_dest<R: PageResolver>(dest: &ImportDest, resolver: &R) -> Option<u32> {
    match dest {
        ImportDest::Named(name) => resolver
            .named_destination(name)
            .and_then(|anchor| resolver.page_index(anchor)),
        ImportDest::Explicit(anchor) => resolver.page_index(*anchor),
        ImportDest::Absent => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
