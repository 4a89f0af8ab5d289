//! Section matching: locate a heading in the page text and collect the body
//! up to the next heading.
//!
//! Headings are recognised by font size and substring containment, not exact
//! equality. Outline titles often differ from the rendered heading (numbering,
//! extra whitespace, runs split across size changes), so the first block that
//! is large enough and contains the title wins. A short title contained in an
//! unrelated large block will match too.

use crate::model::PageText;

use super::walker::TitleTask;

/// Result of scanning one page range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMatch {
    /// Full text of the block the heading was found in, empty if not found
    pub title: String,
    /// Trimmed body text between the heading and the next heading
    pub body: String,
}

impl SectionMatch {
    /// Whether the heading occurrence was found.
    pub fn is_found(&self) -> bool {
        !self.title.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    NotStarted,
    Started,
    Finished,
}

/// Pages `start..=end` (1-indexed), clipped to the document.
///
/// Unknown pages, a start past the end, or `end < start` give an empty range.
pub fn page_range(pages: &[PageText], start: Option<u32>, end: Option<u32>) -> &[PageText] {
    let (Some(start), Some(end)) = (start, end) else {
        return &[];
    };
    if start == 0 {
        return &[];
    }

    let from = (start - 1) as usize;
    let to = (end as usize).min(pages.len());
    if from >= to {
        return &[];
    }
    &pages[from..to]
}

/// Scan `pages` for `heading` and collect text until `next_heading`.
///
/// Blocks count as heading occurrences when their font size is at least
/// `outline_font_size` and their text contains the heading. Body blocks are
/// joined with a single space each, and the result is trimmed.
pub fn find_section(
    pages: &[PageText],
    heading: &str,
    next_heading: &str,
    outline_font_size: u32,
) -> SectionMatch {
    let mut state = ScanState::NotStarted;
    let mut title = String::new();
    let mut body = String::new();

    'pages: for page in pages {
        for block in &page.blocks {
            match state {
                ScanState::NotStarted => {
                    if block.is_heading_occurrence(heading, outline_font_size) {
                        log::trace!("heading {:?} found on page {}", heading, page.number);
                        title = block.text.clone();
                        state = ScanState::Started;
                    }
                }
                ScanState::Started => {
                    if block.is_heading_occurrence(next_heading, outline_font_size) {
                        log::trace!("next heading {:?} on page {}", next_heading, page.number);
                        state = ScanState::Finished;
                    } else {
                        body.push(' ');
                        body.push_str(&block.text);
                    }
                }
                ScanState::Finished => break 'pages,
            }
        }
    }

    SectionMatch {
        title,
        body: body.trim().to_string(),
    }
}

/// Resolve one outline pair against the collected pages.
pub fn resolve_task(
    pages: &[PageText],
    task: &TitleTask<'_>,
    outline_font_size: u32,
) -> SectionMatch {
    let range = page_range(pages, task.start_page, task.end_page);
    find_section(range, task.heading, task.next_heading, outline_font_size)
}
