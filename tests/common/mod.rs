//! Synthetic PDF builder shared by the integration tests.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// One shown string: font size and text (Latin-1 range only).
pub type Run<'a> = (f32, &'a str);

/// One outline entry: level, title, 0-based page index.
pub type Bookmark<'a> = (u32, &'a str, usize);

/// Build a PDF whose pages show `pages` and whose outline is `outline`.
pub fn build_pdf(pages: &[Vec<Run<'_>>], outline: &[Bookmark<'_>]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut page_ids = Vec::with_capacity(pages.len());
    for runs in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Td", vec![72.into(), 720.into()]),
        ];
        for &(size, text) in runs {
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Real(size)],
            ));
            operations.push(Operation::new("Td", vec![0.into(), (-24).into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(win_ansi(text), StringFormat::Literal)],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        }));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => Object::Integer(page_ids.len() as i64),
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if !outline.is_empty() {
        let outlines_id = add_outline(&mut doc, &page_ids, outline);
        catalog.set("Outlines", outlines_id);
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    doc
}

/// WinAnsi agrees with Latin-1 for the characters the tests use.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?')).collect()
}

/// Link a flat `(level, title, page)` list into an outline tree.
fn add_outline(doc: &mut Document, page_ids: &[ObjectId], outline: &[Bookmark<'_>]) -> ObjectId {
    let root_id = doc.new_object_id();
    let ids: Vec<ObjectId> = outline.iter().map(|_| doc.new_object_id()).collect();

    // Parent of each entry: nearest earlier entry with a lower level.
    let mut parents: Vec<Option<usize>> = Vec::with_capacity(outline.len());
    let mut stack: Vec<usize> = Vec::new();
    for (i, &(level, _, _)) in outline.iter().enumerate() {
        while stack.last().is_some_and(|&top| outline[top].0 >= level) {
            stack.pop();
        }
        parents.push(stack.last().copied());
        stack.push(i);
    }

    let mut dicts: Vec<Dictionary> = outline
        .iter()
        .enumerate()
        .map(|(i, &(_, title, page))| {
            dictionary! {
                "Title" => Object::string_literal(title),
                "Parent" => parents[i].map_or(root_id, |p| ids[p]),
                "Dest" => vec![Object::Reference(page_ids[page]), "Fit".into()],
            }
        })
        .collect();
    let mut root = dictionary! { "Type" => "Outlines" };

    let parent_keys: Vec<Option<usize>> = std::iter::once(None)
        .chain((0..outline.len()).map(Some))
        .collect();
    for parent in parent_keys {
        let children: Vec<usize> = (0..outline.len())
            .filter(|&i| parents[i] == parent)
            .collect();
        let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
            continue;
        };
        for pair in children.windows(2) {
            dicts[pair[0]].set("Next", ids[pair[1]]);
            dicts[pair[1]].set("Prev", ids[pair[0]]);
        }
        let holder = match parent {
            Some(p) => &mut dicts[p],
            None => &mut root,
        };
        holder.set("First", ids[first]);
        holder.set("Last", ids[last]);
    }

    for (id, dict) in ids.into_iter().zip(dicts) {
        doc.objects.insert(id, Object::Dictionary(dict));
    }
    doc.objects.insert(root_id, Object::Dictionary(root));
    root_id
}

/// Save a document to `path`.
pub fn save(mut doc: Document, path: &Path) {
    doc.save(path).expect("save pdf");
}
