//! Outline descriptor serialization
//!
//! Flattens a bookmark forest into the line-oriented descriptor handed to
//! the embedding engine. One line per bookmark:
//!
//! ```text
//! <page>|<dashes>|<title>
//! ```
//!
//! `<page>` is the 1-based target page, the dash run length equals the
//! node's depth (zero dashes at root level), and `<title>` carries no raw
//! newlines. Lines are joined with `\n`. An empty forest serializes to
//! the empty string, which downstream means "apply no outline"; that is
//! distinct from `"1||"`, a single bookmark with an empty title.
//!
//! Ordering: at every level siblings are sorted by page ascending with a
//! stable sort (ties keep insertion order), then the forest is emitted
//! pre-order. The sort key for a node without a usable page is 0 while
//! emission falls back to page 1; the two fallbacks are deliberately
//! different and must not be unified.

use super::store::BookmarkForest;
use super::types::BookmarkNode;

/// Sort key used when a node has no usable page
const SORT_PAGE_FALLBACK: u32 = 0;
/// Page emitted when a node has no usable page
const EMIT_PAGE_FALLBACK: u32 = 1;

/// Serialize the forest into its descriptor form
///
/// Total and side-effect free: every forest serializes, and the stored
/// forest is never reordered.
pub fn serialize(forest: &BookmarkForest) -> String {
    let mut lines = Vec::with_capacity(forest.node_count());
    emit_level(forest.roots(), 0, &mut lines);
    lines.join("\n")
}

fn emit_level(siblings: &[BookmarkNode], depth: usize, lines: &mut Vec<String>) {
    let mut ordered: Vec<&BookmarkNode> = siblings.iter().collect();
    // slice sorts are stable, so page ties keep insertion order
    ordered.sort_by_key(|node| node.page.unwrap_or(SORT_PAGE_FALLBACK));

    for node in ordered {
        lines.push(format!(
            "{}|{}|{}",
            node.page.unwrap_or(EMIT_PAGE_FALLBACK),
            "-".repeat(depth),
            scrub_title(&node.title),
        ));
        emit_level(&node.children, depth + 1, lines);
    }
}

/// Replace every newline character (LF or CR) with a single space
fn scrub_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
