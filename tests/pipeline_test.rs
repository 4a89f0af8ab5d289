//! End-to-end extraction from generated PDF files.

mod common;

use pdf_sections::render::read_json;
use pdf_sections::{
    extract_sections, extract_sections_with_options, Error, ExtractOptions, JsonFormat, Section,
    SectionExtractor,
};
use tempfile::tempdir;

fn report_pdf() -> lopdf::Document {
    common::build_pdf(
        &[
            vec![
                (16.0, "1 Introduction"),
                (10.0, "Intro body."),
                (6.0, "footnote tiny"),
            ],
            vec![
                (14.0, "1.1 Background"),
                (10.0, "Résumé body "),
                (10.0, "continues."),
            ],
            vec![(16.0, "2 Methods"), (10.0, "Methods body.")],
        ],
        &[
            (1, "Introduction", 0),
            (2, "Background", 1),
            (1, "Methods", 2),
        ],
    )
}

#[test]
fn test_extract_sections_from_pdf() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    common::save(report_pdf(), &path);

    let options = ExtractOptions::new().with_outline_font_size(12);
    let sections = extract_sections_with_options(&path, options).unwrap();

    assert_eq!(
        sections,
        vec![
            Section::new("1 Introduction", "Intro body."),
            Section::new("Introduction_1.1 Background", "Résumé body continues."),
        ]
    );
}

#[test]
fn test_small_text_never_reaches_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    common::save(report_pdf(), &path);

    let sections = extract_sections_with_options(
        &path,
        ExtractOptions::new().with_outline_font_size(12),
    )
    .unwrap();
    assert!(sections.iter().all(|s| !s.body.contains("footnote")));
}

#[test]
fn test_call_writes_json_array() {
    let dir = tempdir().unwrap();
    let pdf = dir.path().join("report.pdf");
    let output = dir.path().join("out").join("sections.json");
    common::save(report_pdf(), &pdf);

    let options = ExtractOptions::new()
        .with_outline_font_size(12)
        .with_output_path(&output)
        .with_json_format(JsonFormat::Pretty);
    let sections = SectionExtractor::with_options(&pdf, options).call().unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"title\""));
    assert!(written.contains("\"text\""));
    assert!(written.contains("Résumé"));
    assert_eq!(read_json(&output).unwrap(), sections);
}

#[test]
fn test_default_outline_size_matches_body_mentions() {
    // With the default threshold of 7 every kept block can be a heading.
    let dir = tempdir().unwrap();
    let path = dir.path().join("mentions.pdf");
    common::save(
        common::build_pdf(
            &[vec![
                (16.0, "Start"),
                (10.0, "text before End is mentioned"),
                (10.0, " "),
                (16.0, "End"),
            ]],
            &[(1, "Start", 0), (1, "End", 0)],
        ),
        &path,
    );

    let sections = extract_sections(&path).unwrap();
    assert!(sections.is_empty());

    let sections =
        extract_sections_with_options(&path, ExtractOptions::new().with_outline_font_size(12))
            .unwrap();
    assert_eq!(
        sections,
        vec![Section::new("Start", "text before End is mentioned")]
    );
}

#[test]
fn test_pdf_without_outline_writes_empty_array() {
    let dir = tempdir().unwrap();
    let pdf = dir.path().join("plain.pdf");
    let output = dir.path().join("plain.json");
    common::save(
        common::build_pdf(&[vec![(12.0, "Just text")]], &[]),
        &pdf,
    );

    let sections = SectionExtractor::with_options(
        &pdf,
        ExtractOptions::new().with_output_path(&output),
    )
    .call()
    .unwrap();

    assert!(sections.is_empty());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "[]");
}

#[test]
fn test_single_entry_outline_yields_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("single.pdf");
    common::save(
        common::build_pdf(
            &[vec![(16.0, "Only"), (10.0, "Body")]],
            &[(1, "Only", 0)],
        ),
        &path,
    );

    assert!(extract_sections(&path).unwrap().is_empty());
}

#[test]
fn test_reversed_page_range_drops_pair() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reversed.pdf");
    common::save(
        common::build_pdf(
            &[
                vec![(16.0, "Later"), (10.0, "a")],
                vec![(16.0, "Earlier"), (10.0, "b")],
            ],
            &[(1, "Earlier", 1), (1, "Later", 0)],
        ),
        &path,
    );

    let sections =
        extract_sections_with_options(&path, ExtractOptions::new().with_outline_font_size(12))
            .unwrap();
    assert!(sections.is_empty());
}

#[test]
fn test_non_pdf_input_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.pdf");
    std::fs::write(&path, "plain text, not a pdf").unwrap();

    let result = extract_sections(&path);
    assert!(matches!(result, Err(Error::UnknownFormat)));
}
