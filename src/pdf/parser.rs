//! PDF document access
//!
//! Read side of the engine: page map, Info metadata, native outline
//! extraction for import, and the destination lookups the reconciler
//! needs (named destinations and page-anchor resolution).

use std::collections::{BTreeMap, HashSet};

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::outline::{ImportDest, ImportItem, PageAnchor, PageResolver};

use super::types::PdfError;

/// Hard ceiling on outline nesting while walking a document
const MAX_OUTLINE_DEPTH: usize = 64;
/// Safety limit on siblings at one outline level
const MAX_OUTLINE_SIBLINGS: usize = 10_000;
/// Hard ceiling on name tree nesting
const MAX_NAME_TREE_DEPTH: usize = 32;

/// A PDF document held in memory
pub struct PdfParser {
    doc: Document,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfParser {
    /// Load a document from raw bytes
    ///
    /// Rejects anything lopdf cannot parse and documents without pages.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PdfError> {
        let doc = Document::load_mem(data)?;
        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(PdfError::NoPages);
        }
        Ok(Self { doc, pages })
    }

    /// Number of pages in the document
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Title from the /Info dictionary, if present and non-empty
    pub fn title(&self) -> Option<String> {
        let info = match self.doc.trailer.get(b"Info").ok()? {
            Object::Reference(id) => self.doc.get_object(*id).ok()?.as_dict().ok()?,
            Object::Dictionary(dict) => dict,
            _ => return None,
        };
        let title = decode_text(self.resolve(info.get(b"Title").ok()?)?)?;
        let title = title.trim();
        if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        }
    }

    /// The document's native outline, if it has any items
    pub fn existing_outline(&self) -> Option<Vec<ImportItem>> {
        let catalog = self.catalog()?;
        let outlines = self
            .resolve(catalog.get(b"Outlines").ok()?)?
            .as_dict()
            .ok()?;
        let first = match outlines.get(b"First") {
            Ok(Object::Reference(id)) => *id,
            _ => return None,
        };

        let mut visited = HashSet::new();
        let items = self.walk_outline(first, 0, &mut visited);
        if items.is_empty() {
            None
        } else {
            Some(items)
        }
    }

    fn catalog(&self) -> Option<&Dictionary> {
        match self.doc.trailer.get(b"Root").ok()? {
            Object::Reference(id) => self.doc.get_object(*id).ok()?.as_dict().ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Follow an indirect reference one step
    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    fn walk_outline(
        &self,
        first: ObjectId,
        depth: usize,
        visited: &mut HashSet<ObjectId>,
    ) -> Vec<ImportItem> {
        let mut items = Vec::new();
        if depth >= MAX_OUTLINE_DEPTH {
            return items;
        }

        let mut current = Some(first);
        while let Some(node_id) = current {
            // Circular reference protection
            if !visited.insert(node_id) || items.len() >= MAX_OUTLINE_SIBLINGS {
                break;
            }

            let node = match self.doc.get_object(node_id).and_then(Object::as_dict) {
                Ok(dict) => dict,
                Err(_) => break,
            };

            let title = node
                .get(b"Title")
                .ok()
                .and_then(|obj| self.resolve(obj))
                .and_then(decode_text);
            let dest = self.outline_dest(node);
            let children = match node.get(b"First") {
                Ok(Object::Reference(child_id)) => {
                    self.walk_outline(*child_id, depth + 1, visited)
                }
                _ => Vec::new(),
            };

            items.push(ImportItem {
                title,
                dest,
                children,
            });

            current = match node.get(b"Next") {
                Ok(Object::Reference(next_id)) => Some(*next_id),
                _ => None,
            };
        }

        items
    }

    // /Dest on the item wins; otherwise the /D of a /A GoTo action counts.
    fn outline_dest(&self, node: &Dictionary) -> ImportDest {
        if let Ok(dest) = node.get(b"Dest") {
            if let Some(found) = self.classify_dest(dest) {
                return found;
            }
        }

        if let Ok(action) = node.get(b"A") {
            if let Some(action) = self.resolve(action).and_then(|obj| obj.as_dict().ok()) {
                let is_goto = matches!(
                    action.get(b"S"),
                    Ok(Object::Name(kind)) if String::from_utf8_lossy(kind) == "GoTo"
                );
                if is_goto {
                    if let Ok(dest) = action.get(b"D") {
                        if let Some(found) = self.classify_dest(dest) {
                            return found;
                        }
                    }
                }
            }
        }

        ImportDest::Absent
    }

    fn classify_dest(&self, dest: &Object) -> Option<ImportDest> {
        match self.resolve(dest)? {
            // Explicit destination array: [page_ref, /type, ...]
            Object::Array(arr) => match arr.first() {
                Some(Object::Reference(page_id)) => {
                    Some(ImportDest::Explicit(PageAnchor(page_id.0, page_id.1)))
                }
                _ => None,
            },
            Object::String(bytes, _) => decode_bytes(bytes).map(ImportDest::Named),
            Object::Name(name) => Some(ImportDest::Named(
                String::from_utf8_lossy(name).into_owned(),
            )),
            _ => None,
        }
    }

    fn names_dests_tree<'a>(&'a self, catalog: &'a Dictionary) -> Option<&'a Dictionary> {
        let names = self.resolve(catalog.get(b"Names").ok()?)?.as_dict().ok()?;
        self.resolve(names.get(b"Dests").ok()?)?.as_dict().ok()
    }

    fn lookup_name_tree(&self, tree: &Dictionary, name: &str, depth: usize) -> Option<PageAnchor> {
        if depth >= MAX_NAME_TREE_DEPTH {
            return None;
        }

        // Leaf node: /Names is [key1, value1, key2, value2, ...]
        if let Some(pairs) = tree
            .get(b"Names")
            .ok()
            .and_then(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_array().ok())
        {
            for pair in pairs.chunks(2) {
                if pair.len() < 2 {
                    continue;
                }
                let key_matches = match self.resolve(&pair[0]) {
                    Some(Object::String(bytes, _)) => {
                        decode_bytes(bytes).as_deref() == Some(name)
                    }
                    _ => false,
                };
                if key_matches {
                    return self
                        .resolve(&pair[1])
                        .and_then(|value| self.dest_value_anchor(value));
                }
            }
        }

        // Intermediate node: recurse into /Kids
        if let Some(kids) = tree
            .get(b"Kids")
            .ok()
            .and_then(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_array().ok())
        {
            for kid in kids {
                if let Some(subtree) = self.resolve(kid).and_then(|obj| obj.as_dict().ok()) {
                    if let Some(found) = self.lookup_name_tree(subtree, name, depth + 1) {
                        return Some(found);
                    }
                }
            }
        }

        None
    }

    // A named destination value is either the dest array itself or a
    // dictionary carrying the array under /D.
    fn dest_value_anchor(&self, value: &Object) -> Option<PageAnchor> {
        let array = match value {
            Object::Array(arr) => arr,
            Object::Dictionary(dict) => self.resolve(dict.get(b"D").ok()?)?.as_array().ok()?,
            _ => return None,
        };
        match array.first() {
            Some(Object::Reference(page_id)) => Some(PageAnchor(page_id.0, page_id.1)),
            _ => None,
        }
    }
}

impl PageResolver for PdfParser {
    fn named_destination(&self, name: &str) -> Option<PageAnchor> {
        let catalog = self.catalog()?;

        // /Names -> /Dests name tree first
        if let Some(found) = self
            .names_dests_tree(catalog)
            .and_then(|tree| self.lookup_name_tree(tree, name, 0))
        {
            return Some(found);
        }

        // Catalog /Dests dictionary (PDF 1.1 style)
        let dests = self.resolve(catalog.get(b"Dests").ok()?)?.as_dict().ok()?;
        let value = self.resolve(dests.get(name.as_bytes()).ok()?)?;
        self.dest_value_anchor(value)
    }

    fn page_index(&self, anchor: PageAnchor) -> Option<u32> {
        let target: ObjectId = (anchor.0, anchor.1);
        self.pages
            .iter()
            .find_map(|(&number, &page_id)| (page_id == target).then_some(number))
    }
}

/// Decode a PDF text object (UTF-16BE with BOM, UTF-8, or Latin-1)
fn decode_text(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => decode_bytes(bytes),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

fn decode_bytes(bytes: &[u8]) -> Option<String> {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter(|pair| pair.len() == 2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units).ok()
    } else {
        match std::str::from_utf8(bytes) {
            Ok(s) => Some(s.to_string()),
            Err(_) => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
