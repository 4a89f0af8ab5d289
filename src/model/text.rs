//! Size-tagged text types.

use serde::{Deserialize, Serialize};

/// A span of text sharing one reported font size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRun {
    /// Font size in points, rounded to an integer
    pub font_size: u32,
    /// Literal text fragment
    pub text: String,
}

impl CharacterRun {
    /// Create a run from an already rounded size.
    pub fn new(font_size: u32, text: impl Into<String>) -> Self {
        Self {
            font_size,
            text: text.into(),
        }
    }

    /// Create a run from a real-valued size as reported by the content stream.
    pub fn from_points(size: f32, text: impl Into<String>) -> Self {
        Self::new(round_font_size(size), text)
    }
}

/// Round a real-valued font size to the nearest integer, ties to even.
///
/// Negative sizes (mirrored text) count by magnitude.
pub fn round_font_size(size: f32) -> u32 {
    if !size.is_finite() {
        return 0;
    }
    size.abs().round_ties_even() as u32
}

/// Consecutive same-size runs concatenated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Font size shared by every merged run
    pub font_size: u32,
    /// Concatenated text, no separators inserted
    pub text: String,
}

impl TextBlock {
    /// Create a new text block.
    pub fn new(font_size: u32, text: impl Into<String>) -> Self {
        Self {
            font_size,
            text: text.into(),
        }
    }

    /// Whether this block is large enough to be a heading and contains `needle`.
    pub fn is_heading_occurrence(&self, needle: &str, min_font_size: u32) -> bool {
        self.font_size >= min_font_size && self.text.contains(needle)
    }
}

impl From<CharacterRun> for TextBlock {
    fn from(run: CharacterRun) -> Self {
        Self::new(run.font_size, run.text)
    }
}

/// Ordered text blocks of a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed)
    pub number: u32,
    /// Blocks in content-stream order
    pub blocks: Vec<TextBlock>,
}

impl PageText {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            blocks: Vec::new(),
        }
    }

    /// Create a page from its blocks.
    pub fn with_blocks(number: u32, blocks: Vec<TextBlock>) -> Self {
        Self { number, blocks }
    }

    /// Check if the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Concatenated text of all blocks, one per line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_font_size_ties_to_even() {
        assert_eq!(round_font_size(6.5), 6);
        assert_eq!(round_font_size(7.5), 8);
        assert_eq!(round_font_size(11.7), 12);
        assert_eq!(round_font_size(-9.2), 9);
        assert_eq!(round_font_size(f32::NAN), 0);
    }

    #[test]
    fn test_heading_occurrence() {
        let block = TextBlock::new(12, "1. Chapter One ");
        assert!(block.is_heading_occurrence("Chapter One", 12));
        assert!(block.is_heading_occurrence("Chapter One", 7));
        assert!(!block.is_heading_occurrence("Chapter One", 13));
        assert!(!block.is_heading_occurrence("Chapter Two", 12));
    }

    #[test]
    fn test_page_plain_text() {
        let page = PageText::with_blocks(
            1,
            vec![TextBlock::new(12, "Title"), TextBlock::new(9, "Body")],
        );
        assert_eq!(page.plain_text(), "Title\nBody");
        assert!(PageText::new(2).is_empty());
    }
}
