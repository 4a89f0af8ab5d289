//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for the two PDF collaborators the
//! extractor needs (content streams for character runs, and the outline),
//! isolating the concrete PDF library (lopdf) from the section logic.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::detect::sniff_path;
use crate::error::{Error, Result};
use crate::model::OutlineEntry;

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Create an operation from an operator and its operands.
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }
}

/// Where names in a content stream (fonts, XObjects) are looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceScope {
    /// The page's own (possibly inherited) `/Resources`
    Page(PageId),
    /// The `/Resources` of a form XObject stream
    Form(PageId),
}

/// A form XObject ready to be interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct FormXObject {
    /// Object id of the form stream
    pub id: PageId,
    /// `/Matrix`, mapping form space into the invoking user space
    pub matrix: Option<[f32; 6]>,
    /// Decompressed content stream
    pub content: Vec<u8>,
    /// Whether the form carries its own `/Resources`
    pub has_resources: bool,
}

/// Abstract interface for PDF document access.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId).
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the encoding of the font named
    /// `font_name` in `scope`. Falls back to simple decoding if the font or
    /// encoding is unavailable.
    fn decode_text(&self, scope: ResourceScope, font_name: &[u8], bytes: &[u8]) -> String;

    /// Look up the XObject `name` in `scope`. Image XObjects and unknown
    /// names yield `None`.
    fn form_xobject(&self, _scope: ResourceScope, _name: &[u8]) -> Option<FormXObject> {
        None
    }

    /// Return the document outline flattened in reading order.
    fn outline(&self) -> Result<Vec<OutlineEntry>>;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    ///
    /// The header is sniffed first, so a missing file fails with
    /// [`Error::Io`] and a non-PDF with [`Error::UnknownFormat`].
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        sniff_path(path)?;
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Self {
        if doc.is_encrypted() {
            log::warn!("document is encrypted; text may not decode");
        }
        Self { doc }
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;

        // A page without /Contents is blank, not broken.
        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r)? {
                Object::Stream(s) => Ok(s
                    .decompressed_content()
                    .unwrap_or_else(|_| s.content.clone())),
                Object::Array(arr) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        let ops: Vec<ContentOp> = content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect();

        let missing = missing_text_objects(data, &ops);
        if missing > 0 {
            log::warn!(
                "content stream decoded short: {} text object(s) lost after an unparsable span",
                missing
            );
        }
        Ok(ops)
    }

    fn decode_text(&self, scope: ResourceScope, font_name: &[u8], bytes: &[u8]) -> String {
        let font = match scope {
            ResourceScope::Page(page) => self
                .doc
                .get_page_fonts(page)
                .ok()
                .and_then(|fonts| fonts.get(font_name).copied()),
            ResourceScope::Form(_) => self
                .resources(scope)
                .and_then(|res| self.resource_dict(res, b"Font"))
                .and_then(|fonts| fonts.get(font_name).ok())
                .and_then(|font| self.deref_dict(font)),
        };

        if let Some(font_dict) = font {
            if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                    return text;
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn form_xobject(&self, scope: ResourceScope, name: &[u8]) -> Option<FormXObject> {
        let xobjects = self
            .resources(scope)
            .and_then(|res| self.resource_dict(res, b"XObject"))?;
        let id = xobjects.get(name).and_then(Object::as_reference).ok()?;
        let Ok(Object::Stream(stream)) = self.doc.get_object(id) else {
            return None;
        };
        let subtype = stream.dict.get(b"Subtype").and_then(Object::as_name).ok();
        if subtype != Some(b"Form".as_slice()) {
            return None;
        }

        let matrix = stream
            .dict
            .get(b"Matrix")
            .and_then(Object::as_array)
            .ok()
            .and_then(|values| {
                let numbers: Vec<f32> = values.iter().filter_map(object_number).collect();
                <[f32; 6]>::try_from(numbers).ok()
            });

        Some(FormXObject {
            id,
            matrix,
            content: stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
            has_resources: stream.dict.has(b"Resources"),
        })
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        super::outline::read_outline(&self.doc)
    }
}

impl LopdfBackend {
    /// The `/Resources` dictionary of a scope. Page resources are inherited
    /// through the `/Parent` chain.
    fn resources(&self, scope: ResourceScope) -> Option<&Dictionary> {
        match scope {
            ResourceScope::Page(page) => {
                let mut node = self.doc.get_dictionary(page).ok()?;
                for _ in 0..MAX_INHERITANCE_DEPTH {
                    if let Ok(res) = node.get(b"Resources") {
                        return self.deref_dict(res);
                    }
                    let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
                    node = self.doc.get_dictionary(parent).ok()?;
                }
                None
            }
            ResourceScope::Form(id) => match self.doc.get_object(id).ok()? {
                Object::Stream(stream) => self.deref_dict(stream.dict.get(b"Resources").ok()?),
                _ => None,
            },
        }
    }

    fn resource_dict<'a>(
        &'a self,
        resources: &'a Dictionary,
        key: &[u8],
    ) -> Option<&'a Dictionary> {
        self.deref_dict(resources.get(key).ok()?)
    }

    fn deref_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match self.doc.dereference(obj).ok()?.1 {
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Concatenate an array of content stream references, space separated.
    fn concat_streams(&self, arr: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in arr {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    match s.decompressed_content() {
                        Ok(data) => content.extend_from_slice(&data),
                        Err(_) => content.extend_from_slice(&s.content),
                    }
                    content.push(b' ');
                }
            }
        }
        content
    }
}

/// How far up the page tree `/Resources` are looked for.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Number of text objects (`ET` operators) present in the raw stream but
/// missing from the decoded operations.
///
/// The decoder can stop early without an error, typically inside inline
/// image data; everything after that point is dropped.
pub fn missing_text_objects(data: &[u8], ops: &[ContentOp]) -> usize {
    let raw = data
        .split(|b| {
            b.is_ascii_whitespace() || matches!(b, b'(' | b')' | b'[' | b']' | b'<' | b'>')
        })
        .filter(|token| *token == b"ET")
        .count();
    let decoded = ops.iter().filter(|op| op.operator == "ET").count();
    raw.saturating_sub(decoded)
}

fn object_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

/// Helper: extract a number from a [`PdfValue`].
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}
