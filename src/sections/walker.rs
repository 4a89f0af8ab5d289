//! Outline walking: adjacent entry pairs and hierarchical titles.

use crate::model::OutlineEntry;

/// Separator between ancestor titles in a hierarchical title.
pub const TITLE_SEPARATOR: &str = "_";

/// One adjacent pair of outline entries to resolve against the page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleTask<'a> {
    /// Position of the starting entry in the outline
    pub index: usize,
    /// Page of the starting entry
    pub start_page: Option<u32>,
    /// Page of the following entry
    pub end_page: Option<u32>,
    /// Title of the starting entry
    pub heading: &'a str,
    /// Title of the following entry
    pub next_heading: &'a str,
}

/// Build one task per adjacent pair `(outline[i], outline[i + 1])`.
///
/// An outline of N entries yields N-1 tasks in outline order; the last entry
/// never starts a section. Fewer than two entries yield none.
pub fn title_tasks(outline: &[OutlineEntry]) -> Vec<TitleTask<'_>> {
    outline
        .windows(2)
        .enumerate()
        .map(|(index, pair)| TitleTask {
            index,
            start_page: pair[0].page_number,
            end_page: pair[1].page_number,
            heading: &pair[0].title,
            next_heading: &pair[1].title,
        })
        .collect()
}

/// Prefix `leaf` with the titles of the ancestors of `outline[index]`.
///
/// Scans backwards from `index`; every entry whose level is strictly below
/// the lowest level seen so far contributes one segment. Levels may skip
/// (1 → 3) and still yield one segment per qualifying ancestor.
pub fn hierarchical_title(outline: &[OutlineEntry], index: usize, leaf: &str) -> String {
    let Some(entry) = outline.get(index) else {
        return leaf.to_string();
    };

    let mut segments = vec![leaf];
    let mut current_level = entry.level;
    for ancestor in outline[..index].iter().rev() {
        if ancestor.level < current_level {
            segments.push(&ancestor.title);
            current_level = ancestor.level;
        }
    }

    segments.reverse();
    segments.join(TITLE_SEPARATOR)
}
