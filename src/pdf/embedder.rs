//! Outline embedding
//!
//! Write side of the engine: parses an outline descriptor and rebuilds
//! the document's outline tree from it. Descriptor lines look like
//! `12|--|Section title`: the target page, a dash run whose length is
//! the nesting depth, then the title. Parent/child relationships are
//! reconstructed purely from the dash runs of consecutive lines.

use std::collections::BTreeMap;

use lopdf::{dictionary, Document, Object, ObjectId, StringFormat};

use super::types::PdfError;

/// One parsed descriptor line
#[derive(Debug, Clone, PartialEq)]
struct DescriptorLine {
    page: u32,
    depth: usize,
    title: String,
}

/// Outline entry with children rebuilt from dash depths
#[derive(Debug)]
struct OutlineEntry {
    page: u32,
    title: String,
    children: Vec<OutlineEntry>,
}

/// Embed the descriptor into the document's outline tree
///
/// Returns the new document bytes. An empty descriptor returns the input
/// unchanged; a previously present outline is replaced wholesale.
pub fn embed_outline(data: &[u8], descriptor: &str) -> Result<Vec<u8>, PdfError> {
    if descriptor.is_empty() {
        return Ok(data.to_vec());
    }

    let lines = parse_descriptor(descriptor)?;
    let mut position = 0;
    let entries = build_entries(&lines, &mut position, 0);

    let mut doc = Document::load_mem(data)?;
    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(PdfError::NoPages);
    }

    let outlines_id = write_outline_tree(&mut doc, &entries, &pages);

    let catalog_id = doc.trailer.get(b"Root").and_then(Object::as_reference)?;
    doc.get_object_mut(catalog_id)?
        .as_dict_mut()?
        .set("Outlines", outlines_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

fn parse_descriptor(descriptor: &str) -> Result<Vec<DescriptorLine>, PdfError> {
    let mut lines = Vec::new();
    for (number, raw) in descriptor.lines().enumerate() {
        if raw.is_empty() {
            continue;
        }
        let line = parse_line(raw).map_err(|reason| PdfError::BadDescriptor {
            line: number + 1,
            reason,
        })?;
        lines.push(line);
    }
    Ok(lines)
}

// A line is `<page>|<dashes>|<title>`; the title may itself contain `|`.
fn parse_line(raw: &str) -> Result<DescriptorLine, String> {
    let (page_part, rest) = raw
        .split_once('|')
        .ok_or_else(|| "missing page separator".to_string())?;
    let (dash_part, title) = rest
        .split_once('|')
        .ok_or_else(|| "missing depth separator".to_string())?;

    if page_part.is_empty() || !page_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("page is not a number: {page_part:?}"));
    }
    let page: u32 = page_part
        .parse()
        .map_err(|_| format!("page is out of range: {page_part:?}"))?;

    if !dash_part.bytes().all(|b| b == b'-') {
        return Err(format!("depth run is not dashes: {dash_part:?}"));
    }

    Ok(DescriptorLine {
        page,
        depth: dash_part.len(),
        title: title.to_string(),
    })
}

// Rebuild nesting from dash depths. A line deeper than the current level
// attaches under the previous sibling; with no previous sibling it joins
// the current level.
fn build_entries(
    lines: &[DescriptorLine],
    position: &mut usize,
    depth: usize,
) -> Vec<OutlineEntry> {
    let mut level = Vec::new();

    while *position < lines.len() {
        let line = &lines[*position];
        if line.depth < depth {
            break;
        }

        if line.depth > depth {
            if let Some(previous) = level.last_mut() {
                let mut grafted = build_entries(lines, position, depth + 1);
                previous.children.append(&mut grafted);
                continue;
            }
        }

        *position += 1;
        level.push(OutlineEntry {
            page: line.page,
            title: line.title.clone(),
            children: Vec::new(),
        });
    }

    level
}

fn write_outline_tree(
    doc: &mut Document,
    entries: &[OutlineEntry],
    pages: &BTreeMap<u32, ObjectId>,
) -> ObjectId {
    let outlines_id = doc.new_object_id();
    let (level_ids, total) = write_level(doc, entries, outlines_id, pages);

    let mut outlines = dictionary! {
        "Type" => "Outlines",
        "Count" => total,
    };
    if let (Some(first), Some(last)) = (level_ids.first(), level_ids.last()) {
        outlines.set("First", *first);
        outlines.set("Last", *last);
    }
    doc.objects.insert(outlines_id, Object::Dictionary(outlines));
    outlines_id
}

fn write_level(
    doc: &mut Document,
    entries: &[OutlineEntry],
    parent_id: ObjectId,
    pages: &BTreeMap<u32, ObjectId>,
) -> (Vec<ObjectId>, i64) {
    let ids: Vec<ObjectId> = entries.iter().map(|_| doc.new_object_id()).collect();
    let mut total = entries.len() as i64;

    for (index, entry) in entries.iter().enumerate() {
        let (child_ids, descendants) = write_level(doc, &entry.children, ids[index], pages);
        total += descendants;

        let mut item = dictionary! {
            "Title" => text_object(&entry.title),
            "Parent" => parent_id,
            "Dest" => destination(entry.page, pages),
        };
        if index > 0 {
            item.set("Prev", ids[index - 1]);
        }
        if index + 1 < ids.len() {
            item.set("Next", ids[index + 1]);
        }
        if let (Some(first), Some(last)) = (child_ids.first(), child_ids.last()) {
            item.set("First", *first);
            item.set("Last", *last);
            // Positive count keeps the branch open in viewers
            item.set("Count", descendants);
        }
        doc.objects.insert(ids[index], Object::Dictionary(item));
    }

    (ids, total)
}

/// Dest array for a 1-based page, clamped into the document's range
fn destination(page: u32, pages: &BTreeMap<u32, ObjectId>) -> Object {
    let last = pages.len() as u32;
    // get_pages keys are 1-based
    match pages.get(&page.clamp(1, last)) {
        Some(page_id) => Object::Array(vec![(*page_id).into(), "Fit".into()]),
        None => Object::Null,
    }
}

/// Title as a PDF text string (UTF-16BE with BOM when not ASCII)
fn text_object(text: &str) -> Object {
    if text.is_ascii() {
        Object::string_literal(text)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

// ============================================================================
// Tests
// ============================================================================
