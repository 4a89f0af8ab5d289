//! PDF parsing module.

pub mod backend;
mod chars;
mod options;
mod outline;

pub use backend::{FormXObject, LopdfBackend, PdfBackend, ResourceScope};
pub use chars::{CharExtractor, PageRuns};
pub use options::{
    ErrorMode, ExtractOptions, DEFAULT_IGNORE_MINIMUM_FONT_SIZE, DEFAULT_OUTLINE_FONT_SIZE,
    DEFAULT_OUTPUT_PATH,
};
