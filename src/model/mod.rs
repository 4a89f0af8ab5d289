//! Data model shared by the extraction stages.
//!
//! Character runs come out of the content-stream reader, get merged into
//! size-tagged blocks per page, and are matched against outline entries to
//! produce sections. Nothing here outlives a single extraction run.

mod outline;
mod section;
mod text;

pub use outline::OutlineEntry;
pub use section::Section;
pub use text::{round_font_size, CharacterRun, PageText, TextBlock};
