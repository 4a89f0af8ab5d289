//! Extracted sections.

use serde::{Deserialize, Serialize};

/// A titled body of text.
///
/// Serializes as `{"title": ..., "text": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Hierarchical title, ancestors joined with `_`
    pub title: String,

    /// Body text between this heading and the next
    #[serde(rename = "text")]
    pub body: String,
}

impl Section {
    /// Create a new section.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}
