//! Outline (table of contents) entries.

use serde::{Deserialize, Serialize};

/// A single flattened outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Nesting depth (1 = top level)
    pub level: u32,

    /// Entry title as stored in the outline
    pub title: String,

    /// Target page number (1-indexed), `None` if the destination did not resolve
    pub page_number: Option<u32>,
}

impl OutlineEntry {
    /// Create a new outline entry pointing at a page.
    pub fn new(level: u32, title: impl Into<String>, page_number: u32) -> Self {
        Self {
            level,
            title: title.into(),
            page_number: Some(page_number),
        }
    }

    /// Create an entry whose destination page is unknown.
    pub fn unresolved(level: u32, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            page_number: None,
        }
    }
}

impl From<(u32, &str, u32)> for OutlineEntry {
    fn from((level, title, page_number): (u32, &str, u32)) -> Self {
        Self::new(level, title, page_number)
    }
}
