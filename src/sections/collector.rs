//! Text collection: size filtering and same-size merging.

use crate::model::{CharacterRun, PageText, TextBlock};
use crate::parser::PageRuns;

/// Drop runs whose font size is below `min_font_size` (exclusive).
pub fn filter_runs(
    runs: impl IntoIterator<Item = CharacterRun>,
    min_font_size: u32,
) -> impl Iterator<Item = CharacterRun> {
    runs.into_iter().filter(move |run| run.font_size >= min_font_size)
}

/// Concatenate consecutive items of equal font size into blocks.
///
/// Text is joined without separators. Empty items never open a block, so the
/// result holds no empty blocks and no two neighbours share a size. Applying
/// this to its own output returns it unchanged.
pub fn merge_same_size<I>(items: I) -> Vec<TextBlock>
where
    I: IntoIterator,
    I::Item: Into<TextBlock>,
{
    let mut blocks: Vec<TextBlock> = Vec::new();

    for item in items {
        let item = item.into();
        if item.text.is_empty() {
            continue;
        }
        match blocks.last_mut() {
            Some(last) if last.font_size == item.font_size => last.text.push_str(&item.text),
            _ => blocks.push(item),
        }
    }

    blocks
}

/// Filter and merge the runs of one page.
pub fn collect_page(page: PageRuns, min_font_size: u32) -> PageText {
    let blocks = merge_same_size(filter_runs(page.runs, min_font_size));
    PageText::with_blocks(page.number, blocks)
}

/// Filter and merge the runs of every page, preserving page order.
pub fn collect_pages(pages: Vec<PageRuns>, min_font_size: u32) -> Vec<PageText> {
    let pages: Vec<PageText> = pages
        .into_iter()
        .map(|page| collect_page(page, min_font_size))
        .collect();
    log::debug!(
        "collected {} blocks across {} pages",
        pages.iter().map(|p| p.blocks.len()).sum::<usize>(),
        pages.len()
    );
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(size: u32, text: &str) -> CharacterRun {
        CharacterRun::new(size, text)
    }

    #[test]
    fn test_merge_same_size_runs() {
        let blocks = merge_same_size(vec![
            run(12, "Chap"),
            run(12, "ter One"),
            run(9, "Body "),
            run(9, "text."),
            run(12, "Chapter Two"),
        ]);

        assert_eq!(
            blocks,
            vec![
                TextBlock::new(12, "Chapter One"),
                TextBlock::new(9, "Body text."),
                TextBlock::new(12, "Chapter Two"),
            ]
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let blocks = merge_same_size(vec![
            run(10, "a"),
            run(10, "b"),
            run(11, "c"),
            run(10, "d"),
        ]);
        assert_eq!(merge_same_size(blocks.clone()), blocks);
        assert!(blocks.windows(2).all(|w| w[0].font_size != w[1].font_size));
    }

    #[test]
    fn test_filter_is_inclusive_and_drops_small_runs() {
        let page = PageRuns {
            number: 4,
            runs: vec![
                run(7, "kept "),
                run(6, "footnote"),
                run(7, "also kept"),
            ],
        };

        let collected = collect_page(page, 7);
        assert_eq!(collected.number, 4);
        assert_eq!(collected.blocks, vec![TextBlock::new(7, "kept also kept")]);
        assert!(!collected.plain_text().contains("footnote"));
    }

    #[test]
    fn test_empty_page_yields_no_blocks() {
        let pages = collect_pages(
            vec![
                PageRuns {
                    number: 1,
                    runs: vec![run(5, "tiny")],
                },
                PageRuns {
                    number: 2,
                    runs: vec![],
                },
            ],
            7,
        );

        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(PageText::is_empty));
    }

    #[test]
    fn test_empty_runs_do_not_split_blocks() {
        let blocks = merge_same_size(vec![run(10, "a"), run(12, ""), run(10, "b")]);
        assert_eq!(blocks, vec![TextBlock::new(10, "ab")]);
    }
}
