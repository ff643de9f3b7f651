//! In-memory fixture documents for engine tests

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

pub struct FixtureDoc {
    pub doc: Document,
    pub page_ids: Vec<ObjectId>,
    pub catalog_id: ObjectId,
}

/// Minimal valid document with the given number of pages
pub fn base_doc(page_count: usize) -> FixtureDoc {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::new();
    for index in 0..page_count {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Page {}", index + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| (*id).into()).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    FixtureDoc {
        doc,
        page_ids,
        catalog_id,
    }
}

pub fn to_bytes(mut doc: Document) -> Vec<u8> {
    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

pub fn pdf_with_pages(count: usize) -> Vec<u8> {
    to_bytes(base_doc(count).doc)
}

pub fn pdf_with_title(count: usize, title: &str) -> Vec<u8> {
    let mut fixture = base_doc(count);
    let info_id = fixture.doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
    });
    fixture.doc.trailer.set("Info", info_id);
    to_bytes(fixture.doc)
}

/// Three pages with a nested outline exercising every destination kind:
///
/// ```text
/// Part I            explicit dest -> page 1
///   Chapter 1       GoTo action -> page 2
///   Chapter 2       named dest "chap.2" -> page 3 via the /Names tree
/// ```
pub fn pdf_with_outline() -> Vec<u8> {
    let mut fixture = base_doc(3);
    let page_1 = fixture.page_ids[0];
    let page_2 = fixture.page_ids[1];
    let page_3 = fixture.page_ids[2];
    let catalog_id = fixture.catalog_id;
    let doc = &mut fixture.doc;

    let outlines_id = doc.new_object_id();
    let part_id = doc.new_object_id();
    let ch1_id = doc.new_object_id();
    let ch2_id = doc.new_object_id();

    doc.objects.insert(
        outlines_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => part_id,
            "Last" => part_id,
            "Count" => 3,
        }),
    );
    doc.objects.insert(
        part_id,
        Object::Dictionary(dictionary! {
            "Title" => Object::string_literal("Part I"),
            "Parent" => outlines_id,
            "First" => ch1_id,
            "Last" => ch2_id,
            "Count" => 2,
            "Dest" => vec![page_1.into(), "Fit".into()],
        }),
    );
    doc.objects.insert(
        ch1_id,
        Object::Dictionary(dictionary! {
            "Title" => Object::string_literal("Chapter 1"),
            "Parent" => part_id,
            "Next" => ch2_id,
            "A" => dictionary! {
                "S" => "GoTo",
                "D" => vec![page_2.into(), "Fit".into()],
            },
        }),
    );
    doc.objects.insert(
        ch2_id,
        Object::Dictionary(dictionary! {
            "Title" => Object::string_literal("Chapter 2"),
            "Parent" => part_id,
            "Prev" => ch1_id,
            "Dest" => Object::string_literal("chap.2"),
        }),
    );

    let dests_tree_id = doc.add_object(dictionary! {
        "Names" => vec![
            Object::string_literal("chap.2"),
            Object::Array(vec![page_3.into(), "Fit".into()]),
        ],
    });
    let names_id = doc.add_object(dictionary! {
        "Dests" => dests_tree_id,
    });

    let catalog = doc
        .get_object_mut(catalog_id)
        .unwrap()
        .as_dict_mut()
        .unwrap();
    catalog.set("Outlines", outlines_id);
    catalog.set("Names", names_id);

    to_bytes(fixture.doc)
}

/// Two pages with a catalog-level /Dests dictionary ("intro" -> page 2)
pub fn pdf_with_legacy_dests() -> Vec<u8> {
    let mut fixture = base_doc(2);
    let page_2 = fixture.page_ids[1];
    let catalog_id = fixture.catalog_id;
    let doc = &mut fixture.doc;

    let dests_id = doc.add_object(dictionary! {
        "intro" => vec![page_2.into(), "Fit".into()],
    });
    let catalog = doc
        .get_object_mut(catalog_id)
        .unwrap()
        .as_dict_mut()
        .unwrap();
    catalog.set("Dests", dests_id);

    to_bytes(fixture.doc)
}

/// Outline whose sibling chain loops back on itself
pub fn pdf_with_cyclic_outline() -> Vec<u8> {
    let mut fixture = base_doc(2);
    let page_1 = fixture.page_ids[0];
    let catalog_id = fixture.catalog_id;
    let doc = &mut fixture.doc;

    let outlines_id = doc.new_object_id();
    let a_id = doc.new_object_id();
    let b_id = doc.new_object_id();

    doc.objects.insert(
        outlines_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => a_id,
            "Last" => b_id,
            "Count" => 2,
        }),
    );
    doc.objects.insert(
        a_id,
        Object::Dictionary(dictionary! {
            "Title" => Object::string_literal("A"),
            "Parent" => outlines_id,
            "Next" => b_id,
            "Dest" => vec![page_1.into(), "Fit".into()],
        }),
    );
    // Next pointer loops back to A
    doc.objects.insert(
        b_id,
        Object::Dictionary(dictionary! {
            "Title" => Object::string_literal("B"),
            "Parent" => outlines_id,
            "Prev" => a_id,
            "Next" => a_id,
        }),
    );

    let catalog = doc
        .get_object_mut(catalog_id)
        .unwrap()
        .as_dict_mut()
        .unwrap();
    catalog.set("Outlines", outlines_id);

    to_bytes(fixture.doc)
}

/// Single outline item whose title is stored as UTF-16BE with a BOM
pub fn pdf_with_utf16_outline_title(title: &str) -> Vec<u8> {
    let mut fixture = base_doc(1);
    let page_1 = fixture.page_ids[0];
    let catalog_id = fixture.catalog_id;
    let doc = &mut fixture.doc;

    let mut bytes = vec![0xFE, 0xFF];
    for unit in title.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }

    let outlines_id = doc.new_object_id();
    let node_id = doc.new_object_id();
    doc.objects.insert(
        outlines_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => node_id,
            "Last" => node_id,
            "Count" => 1,
        }),
    );
    doc.objects.insert(
        node_id,
        Object::Dictionary(dictionary! {
            "Title" => Object::String(bytes, StringFormat::Hexadecimal),
            "Parent" => outlines_id,
            "Dest" => vec![page_1.into(), "Fit".into()],
        }),
    );

    let catalog = doc
        .get_object_mut(catalog_id)
        .unwrap()
        .as_dict_mut()
        .unwrap();
    catalog.set("Outlines", outlines_id);

    to_bytes(fixture.doc)
}
