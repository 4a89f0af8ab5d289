//! Character-run extraction from page content streams.
//!
//! Walks the text operators of each page in content-stream order and reports
//! every shown string together with its effective font size. No geometric
//! reordering happens here; runs come out in the order the producer wrote them.

use crate::error::{Error, Result};
use crate::model::CharacterRun;

use super::backend::{
    get_number_from_value, ContentOp, PageId, PdfBackend, PdfValue, ResourceScope,
};
use super::options::ErrorMode;

/// `TJ` adjustments beyond this many thousandths of an em read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Form XObjects nested deeper than this are skipped.
const MAX_FORM_DEPTH: usize = 12;

/// Character runs of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRuns {
    /// Page number (1-indexed)
    pub number: u32,
    /// Runs in content-stream order
    pub runs: Vec<CharacterRun>,
}

/// Extracts [`CharacterRun`]s from the pages of a document.
pub struct CharExtractor<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: PdfBackend + ?Sized> CharExtractor<'a, B> {
    /// Create an extractor over a backend.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Extract runs for every page, in page order.
    ///
    /// In [`ErrorMode::Lenient`] a page that fails to extract is logged and
    /// returned with no runs.
    pub fn extract_all(&self, error_mode: ErrorMode) -> Result<Vec<PageRuns>> {
        let pages = self.backend.pages();
        let mut result = Vec::with_capacity(pages.len());

        for (number, page_id) in pages {
            let runs = match self.page_runs(number, page_id) {
                Ok(runs) => runs,
                Err(e) if error_mode == ErrorMode::Lenient => {
                    log::warn!("Failed to extract text from page {}: {}", number, e);
                    Vec::new()
                }
                Err(e) => return Err(e),
            };
            log::trace!("page {}: {} character runs", number, runs.len());
            result.push(PageRuns { number, runs });
        }

        Ok(result)
    }

    /// Extract runs for a single page (1-indexed).
    pub fn extract_page(&self, page_num: u32) -> Result<Vec<CharacterRun>> {
        let pages = self.backend.pages();
        let page_id = pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;
        self.page_runs(page_num, *page_id)
    }

    fn page_runs(&self, page_num: u32, page_id: PageId) -> Result<Vec<CharacterRun>> {
        let content = self.backend.page_content(page_id)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let ops = self.backend.decode_content(&content)?;

        let mut walk = PageWalk {
            backend: self.backend,
            page_num,
            runs: Vec::new(),
            active_forms: Vec::new(),
        };
        walk.interpret(&ops, ResourceScope::Page(page_id), GraphicsState::default())?;
        Ok(walk.runs)
    }
}

/// Interpretation state for one page, shared by nested form XObjects.
struct PageWalk<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    page_num: u32,
    runs: Vec<CharacterRun>,
    /// Forms currently being interpreted, innermost last
    active_forms: Vec<PageId>,
}

impl<B: PdfBackend + ?Sized> PageWalk<'_, B> {
    /// Interpret content operations, tracking the state that affects size.
    ///
    /// `state` is owned, so whatever a form does to it is undone on return.
    fn interpret(
        &mut self,
        ops: &[ContentOp],
        scope: ResourceScope,
        mut state: GraphicsState,
    ) -> Result<()> {
        let mut saved: Vec<GraphicsState> = Vec::new();
        let mut text_matrix = Matrix::IDENTITY;
        let mut in_text_block = false;

        for op in ops {
            match op.operator.as_str() {
                "q" => saved.push(state.clone()),
                "Q" => {
                    if let Some(prev) = saved.pop() {
                        state = prev;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(&op.operands) {
                        state.ctm = m.multiply(&state.ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    text_matrix = Matrix::IDENTITY;
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    let size = op
                        .operands
                        .get(1)
                        .and_then(get_number_from_value)
                        .ok_or(Error::MissingFontSize {
                            page: self.page_num,
                        })?;
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        state.font = Some(name.clone());
                    }
                    state.font_size = Some(size);
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(&op.operands) {
                        text_matrix = m;
                    }
                }
                "Tj" | "TJ" | "'" | "\"" if in_text_block => {
                    let text = self.shown_text(scope, &state, op);
                    if text.is_empty() {
                        continue;
                    }
                    let font_size = state.font_size.ok_or(Error::MissingFontSize {
                        page: self.page_num,
                    })?;
                    let scale = text_matrix.multiply(&state.ctm).vertical_scale();
                    self.runs.push(CharacterRun::from_points(font_size * scale, text));
                }
                "Do" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        self.draw_form(scope, name, &state)?;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Run a form XObject's content in place of its `Do`.
    fn draw_form(
        &mut self,
        scope: ResourceScope,
        name: &[u8],
        state: &GraphicsState,
    ) -> Result<()> {
        let Some(form) = self.backend.form_xobject(scope, name) else {
            return Ok(());
        };
        if self.active_forms.contains(&form.id) || self.active_forms.len() >= MAX_FORM_DEPTH {
            log::warn!(
                "page {}: form {} not entered (nested {} deep or self-referencing)",
                self.page_num,
                String::from_utf8_lossy(name),
                self.active_forms.len()
            );
            return Ok(());
        }

        let ops = self.backend.decode_content(&form.content)?;
        let mut inner = state.clone();
        if let Some(m) = form.matrix {
            inner.ctm = Matrix::from(m).multiply(&state.ctm);
        }
        // Forms without their own resources use the invoking ones.
        let inner_scope = if form.has_resources {
            ResourceScope::Form(form.id)
        } else {
            scope
        };

        log::trace!(
            "page {}: entering form {}",
            self.page_num,
            String::from_utf8_lossy(name)
        );
        self.active_forms.push(form.id);
        let result = self.interpret(&ops, inner_scope, inner);
        self.active_forms.pop();
        result
    }

    /// Decode the string operand(s) of a text-showing operator.
    fn shown_text(&self, scope: ResourceScope, state: &GraphicsState, op: &ContentOp) -> String {
        let font = state.font.as_deref().unwrap_or_default();
        let decode = |bytes: &[u8]| self.backend.decode_text(scope, font, bytes);

        match op.operator.as_str() {
            "TJ" => {
                let Some(PdfValue::Array(items)) = op.operands.first() else {
                    return String::new();
                };
                let mut combined = String::new();
                for item in items {
                    match item {
                        PdfValue::Str(bytes) => combined.push_str(&decode(bytes.as_slice())),
                        other => {
                            // Negative values advance to the right
                            let adjustment = get_number_from_value(other).map_or(0.0, |n| -n);
                            if adjustment > TJ_SPACE_THRESHOLD {
                                push_word_space(&mut combined);
                            }
                        }
                    }
                }
                combined
            }
            "\"" => match op.operands.get(2) {
                Some(PdfValue::Str(bytes)) => decode(bytes.as_slice()),
                _ => String::new(),
            },
            _ => match op.operands.first() {
                Some(PdfValue::Str(bytes)) => decode(bytes.as_slice()),
                _ => String::new(),
            },
        }
    }
}

/// Append a word space unless one is already there or the script has none.
fn push_word_space(text: &mut String) {
    match text.chars().last() {
        Some(c) if !c.is_whitespace() && !is_spaceless_script_char(c) => text.push(' '),
        _ => {}
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[derive(Debug, Clone, Default)]
struct GraphicsState {
    ctm: Matrix,
    font: Option<Vec<u8>>,
    font_size: Option<f32>,
}

/// 2D affine matrix `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f32; 6]> for Matrix {
    fn from([a, b, c, d, e, f]: [f32; 6]) -> Self {
        Self { a, b, c, d, e, f }
    }
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[PdfValue]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n = |i: usize| get_number_from_value(&operands[i]);
        Some(Self {
            a: n(0)?,
            b: n(1)?,
            c: n(2)?,
            d: n(3)?,
            e: n(4)?,
            f: n(5)?,
        })
    }

    /// `self × other`
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Length of the transformed unit vertical vector.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}
