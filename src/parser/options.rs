//! Extraction options and configuration.

use std::path::PathBuf;

use crate::render::JsonFormat;

/// Default minimum font size for a block to count as a heading.
pub const DEFAULT_OUTLINE_FONT_SIZE: u32 = 7;

/// Default minimum font size for a character run to be kept at all.
pub const DEFAULT_IGNORE_MINIMUM_FONT_SIZE: u32 = 7;

/// Default location of the JSON output.
pub const DEFAULT_OUTPUT_PATH: &str = "src/resources/output.json";

/// Options for extracting sections from a PDF document.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Minimum font size (inclusive) for a block to be a heading occurrence
    pub outline_font_size: u32,

    /// Minimum font size (inclusive) for a character run to survive filtering
    pub ignore_minimum_font_size: u32,

    /// Where [`SectionExtractor::call`](crate::SectionExtractor::call) writes JSON
    pub output_path: PathBuf,

    /// JSON layout of the output file
    pub json_format: JsonFormat,

    /// Error handling mode for page content
    pub error_mode: ErrorMode,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading font-size threshold.
    pub fn with_outline_font_size(mut self, size: u32) -> Self {
        self.outline_font_size = size;
        self
    }

    /// Set the run filtering font-size threshold.
    pub fn with_ignore_minimum_font_size(mut self, size: u32) -> Self {
        self.ignore_minimum_font_size = size;
        self
    }

    /// Set the output file path.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (unreadable pages count as empty).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            outline_font_size: DEFAULT_OUTLINE_FONT_SIZE,
            ignore_minimum_font_size: DEFAULT_IGNORE_MINIMUM_FONT_SIZE,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            json_format: JsonFormat::Compact,
            error_mode: ErrorMode::Strict,
        }
    }
}

/// Error handling mode during page extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Log the failure and treat the page as empty
    Lenient,
}
