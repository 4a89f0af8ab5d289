//! Outline (bookmark) extraction.
//!
//! Flattens the `/Outlines` tree into `(level, title, page)` entries in
//! depth-first reading order, the shape a table of contents is usually
//! consumed in.

use std::collections::{HashMap, HashSet};

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::Result;
use crate::model::OutlineEntry;

use super::backend::decode_text_simple;

/// Named destinations can point at other named destinations.
const MAX_DEST_INDIRECTION: u8 = 8;

/// Read the document outline. Documents without one yield an empty list.
pub(crate) fn read_outline(doc: &LopdfDocument) -> Result<Vec<OutlineEntry>> {
    let mut entries = Vec::new();

    let Ok(catalog) = doc.catalog() else {
        return Ok(entries);
    };
    let Some(root) = catalog
        .get(b"Outlines")
        .ok()
        .and_then(|o| deref_dict(doc, o))
    else {
        return Ok(entries);
    };

    let walker = OutlineWalk {
        doc,
        page_numbers: doc.get_pages().into_iter().map(|(n, id)| (id, n)).collect(),
        named: named_destinations(doc, catalog),
    };

    let mut visited = HashSet::new();
    walker.walk(reference(root, b"First"), 1, &mut visited, &mut entries);

    log::debug!("outline has {} entries", entries.len());
    Ok(entries)
}

struct OutlineWalk<'a> {
    doc: &'a LopdfDocument,
    page_numbers: HashMap<ObjectId, u32>,
    named: HashMap<Vec<u8>, Object>,
}

impl OutlineWalk<'_> {
    /// Walk a sibling chain, recursing into children.
    fn walk(
        &self,
        mut item: Option<ObjectId>,
        level: u32,
        visited: &mut HashSet<ObjectId>,
        entries: &mut Vec<OutlineEntry>,
    ) {
        while let Some(id) = item {
            if !visited.insert(id) {
                log::warn!("outline item {:?} visited twice; stopping this branch", id);
                return;
            }
            let Ok(dict) = self.doc.get_dictionary(id) else {
                log::warn!("outline item {:?} is not a dictionary", id);
                return;
            };

            let title = dict
                .get(b"Title")
                .ok()
                .and_then(|o| decode_pdf_string(self.doc, o))
                .unwrap_or_default();
            let page_number = self.destination_page(dict);
            if page_number.is_none() {
                log::warn!("outline entry {:?} has no resolvable destination", title);
            }

            entries.push(OutlineEntry {
                level,
                title,
                page_number,
            });

            self.walk(reference(dict, b"First"), level + 1, visited, entries);
            item = reference(dict, b"Next");
        }
    }

    /// Target page of an outline item, from `/Dest` or a GoTo action.
    fn destination_page(&self, item: &Dictionary) -> Option<u32> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.resolve(dest, 0);
        }

        let action = item.get(b"A").ok().and_then(|a| deref_dict(self.doc, a))?;
        if let Ok(kind) = action.get(b"S").and_then(Object::as_name) {
            if kind != b"GoTo".as_slice() {
                return None;
            }
        }
        self.resolve(action.get(b"D").ok()?, 0)
    }

    fn resolve(&self, dest: &Object, depth: u8) -> Option<u32> {
        if depth > MAX_DEST_INDIRECTION {
            return None;
        }
        let (_, dest) = self.doc.dereference(dest).ok()?;

        match dest {
            Object::Array(arr) => match arr.first()? {
                Object::Reference(id) => self.page_numbers.get(id).copied(),
                // Some writers use a 0-based page index instead of a reference.
                Object::Integer(index) => {
                    let number = u32::try_from(*index).ok()? + 1;
                    (number as usize <= self.page_numbers.len()).then_some(number)
                }
                _ => None,
            },
            Object::Name(name) | Object::String(name, _) => {
                let target = self.named.get(name)?;
                self.resolve(target, depth + 1)
            }
            Object::Dictionary(d) => self.resolve(d.get(b"D").ok()?, depth + 1),
            _ => None,
        }
    }
}

/// Collect named destinations from the catalog `/Dests` dictionary and the
/// `/Names /Dests` name tree.
fn named_destinations(doc: &LopdfDocument, catalog: &Dictionary) -> HashMap<Vec<u8>, Object> {
    let mut named = HashMap::new();

    if let Some(dests) = catalog.get(b"Dests").ok().and_then(|o| deref_dict(doc, o)) {
        for (name, dest) in dests.iter() {
            named.insert(name.clone(), dest.clone());
        }
    }

    let tree = catalog
        .get(b"Names")
        .ok()
        .and_then(|o| deref_dict(doc, o))
        .and_then(|names| names.get(b"Dests").ok())
        .and_then(|o| deref_dict(doc, o));
    if let Some(tree) = tree {
        let mut visited = HashSet::new();
        collect_name_tree(doc, tree, &mut visited, &mut named);
    }

    named
}

fn collect_name_tree(
    doc: &LopdfDocument,
    node: &Dictionary,
    visited: &mut HashSet<ObjectId>,
    named: &mut HashMap<Vec<u8>, Object>,
) {
    if let Ok(pairs) = node.get(b"Names").and_then(Object::as_array) {
        for pair in pairs.chunks_exact(2) {
            if let Object::String(key, _) = &pair[0] {
                named.insert(key.clone(), pair[1].clone());
            }
        }
    }

    if let Ok(kids) = node.get(b"Kids").and_then(Object::as_array) {
        for kid in kids {
            let Ok(id) = kid.as_reference() else { continue };
            if !visited.insert(id) {
                continue;
            }
            if let Ok(child) = doc.get_dictionary(id) {
                collect_name_tree(doc, child, visited, named);
            }
        }
    }
}

fn reference(dict: &Dictionary, key: &[u8]) -> Option<ObjectId> {
    dict.get(key).and_then(Object::as_reference).ok()
}

fn deref_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match doc.dereference(obj).ok()?.1 {
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, UTF-8, or PDFDocEncoding).
fn decode_pdf_string(doc: &LopdfDocument, obj: &Object) -> Option<String> {
    match doc.dereference(obj).ok()?.1 {
        Object::String(bytes, _) => {
            let text = decode_text_simple(bytes);
            Some(text.trim_start_matches('\u{FEFF}').to_string())
        }
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
        _ => None,
    }
}
