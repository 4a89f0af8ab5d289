//! # pdf-sections
//!
//! Extract titled text sections from a PDF by matching its outline (table of
//! contents) against font-size-tagged text.
//!
//! Every page's text runs are filtered by size and merged into same-size
//! blocks. Each adjacent pair of outline entries then selects a page range,
//! inside which the first large-enough block containing the entry's title
//! starts a section and the block containing the next entry's title ends it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_sections::{ExtractOptions, SectionExtractor};
//!
//! fn main() -> pdf_sections::Result<()> {
//!     let options = ExtractOptions::new()
//!         .with_outline_font_size(12)
//!         .with_output_path("sections.json");
//!
//!     // Extract and write the JSON array in one go
//!     let sections = SectionExtractor::with_options("document.pdf", options).call()?;
//!     println!("{} sections", sections.len());
//!
//!     Ok(())
//! }
//! ```

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod sections;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{CharacterRun, OutlineEntry, PageText, Section, TextBlock};
pub use parser::{CharExtractor, ErrorMode, ExtractOptions, LopdfBackend, PdfBackend};
pub use render::JsonFormat;

use std::path::{Path, PathBuf};

/// Section extraction for one PDF file.
///
/// Construction is cheap; the file is opened by [`extract`](Self::extract)
/// and released before matching starts.
#[derive(Debug, Clone)]
pub struct SectionExtractor {
    path: PathBuf,
    options: ExtractOptions,
}

impl SectionExtractor {
    /// Create an extractor with default options.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_options(path, ExtractOptions::default())
    }

    /// Create an extractor with custom options.
    pub fn with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options,
        }
    }

    /// Path of the input PDF.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Options in effect.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Read the PDF and return its merged page text and outline.
    pub fn load(&self) -> Result<(Vec<PageText>, Vec<OutlineEntry>)> {
        let backend = LopdfBackend::load_file(&self.path)?;
        log::debug!(
            "loaded {} (PDF {}, {} pages)",
            self.path.display(),
            backend.version(),
            backend.page_count()
        );
        load_from_backend(&backend, &self.options)
    }

    /// Extract sections without writing any output.
    pub fn extract(&self) -> Result<Vec<Section>> {
        let (pages, outline) = self.load()?;
        Ok(sections::extract_sections(
            &pages,
            &outline,
            self.options.outline_font_size,
        ))
    }

    /// Extract sections and write them as a JSON array to the configured
    /// output path.
    pub fn call(&self) -> Result<Vec<Section>> {
        let sections = self.extract()?;
        render::write_json(&sections, &self.options.output_path, self.options.json_format)?;
        Ok(sections)
    }
}

/// Collect merged page text and the outline from any backend.
pub fn load_from_backend<B: PdfBackend + ?Sized>(
    backend: &B,
    options: &ExtractOptions,
) -> Result<(Vec<PageText>, Vec<OutlineEntry>)> {
    let runs = CharExtractor::new(backend).extract_all(options.error_mode)?;
    let pages = sections::collect_pages(runs, options.ignore_minimum_font_size);
    let outline = backend.outline()?;
    Ok((pages, outline))
}

/// Extract sections from a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use pdf_sections::extract_sections;
///
/// for section in extract_sections("document.pdf").unwrap() {
///     println!("{}: {} chars", section.title, section.body.len());
/// }
/// ```
pub fn extract_sections<P: AsRef<Path>>(path: P) -> Result<Vec<Section>> {
    SectionExtractor::new(path).extract()
}

/// Extract sections from a PDF file with custom options.
pub fn extract_sections_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<Vec<Section>> {
    SectionExtractor::with_options(path, options).extract()
}

/// Extract sections and write them as JSON to `options.output_path`.
pub fn extract_to_json<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Vec<Section>> {
    SectionExtractor::with_options(path, options).call()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_construction() {
        let extractor = SectionExtractor::new("report.pdf");
        assert_eq!(extractor.path(), Path::new("report.pdf"));
        assert_eq!(extractor.options().outline_font_size, 7);
        assert_eq!(extractor.options().ignore_minimum_font_size, 7);
    }

    #[test]
    fn test_missing_file_surfaces_io_error() {
        let result = extract_sections("no/such/file.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
