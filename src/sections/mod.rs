//! The section pipeline.
//!
//! Three stages, run strictly one after the other:
//!
//! 1. [`collector`] filters character runs by size and merges same-size
//!    neighbours into [`TextBlock`](crate::model::TextBlock)s per page.
//! 2. [`walker`] turns the outline into adjacent `(current, next)` pairs and
//!    builds hierarchical titles.
//! 3. [`matcher`] scans each pair's page range for the heading and collects
//!    the body up to the next heading.

pub mod collector;
pub mod matcher;
pub mod walker;

pub use collector::{collect_page, collect_pages, filter_runs, merge_same_size};
pub use matcher::{find_section, page_range, resolve_task, SectionMatch};
pub use walker::{hierarchical_title, title_tasks, TitleTask, TITLE_SEPARATOR};

use crate::model::{OutlineEntry, PageText, Section};

/// Match every adjacent outline pair against the collected pages.
///
/// Pairs whose heading is never found, or whose body comes out empty, are
/// dropped. Output follows outline order.
pub fn extract_sections(
    pages: &[PageText],
    outline: &[OutlineEntry],
    outline_font_size: u32,
) -> Vec<Section> {
    let tasks = title_tasks(outline);
    let mut sections = Vec::with_capacity(tasks.len());

    for task in &tasks {
        let found = resolve_task(pages, task, outline_font_size);
        if !found.is_found() || found.body.is_empty() {
            log::debug!(
                "dropping outline entry {} {:?}: {}",
                task.index,
                task.heading,
                if found.is_found() { "empty body" } else { "heading not found" }
            );
            continue;
        }

        let title = hierarchical_title(outline, task.index, &found.title);
        sections.push(Section::new(title, found.body));
    }

    log::debug!(
        "{} of {} outline pairs produced sections",
        sections.len(),
        tasks.len()
    );
    sections
}
