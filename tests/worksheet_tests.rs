mod common;

use common::pdf_assertions::font_base_names;
use common::{GeneratedPdf, TestResult, fixtures, init_logging};
use genki_sheets::{ContentItem, ErrorKind, Worksheet};

#[test]
fn test_every_worksheet_renders_with_the_fallback_font() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let fonts = fixtures::fallback_fonts();

    for sheet in Worksheet::all()? {
        let summary = sheet.generate(fonts.clone(), dir.path())?;
        assert_eq!(summary.path, dir.path().join(sheet.filename));

        let pdf = GeneratedPdf::from_file(&summary.path)?;
        assert_eq!(pdf.page_count(), summary.pages, "{}", sheet.filename);

        let breaks = sheet
            .content
            .iter()
            .filter(|item| **item == ContentItem::PageBreak)
            .count();
        assert!(
            summary.pages > breaks,
            "{} has {} breaks but only {} pages",
            sheet.filename,
            breaks,
            summary.pages
        );
        assert!(
            font_base_names(&pdf.doc).iter().all(|name| name.starts_with("Helvetica")),
            "{} should only use builtin fonts",
            sheet.filename
        );
    }
    Ok(())
}

#[test]
fn test_worksheets_without_any_font_fail_cleanly() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let fonts = fixtures::strict_fonts();

    for sheet in Worksheet::all()? {
        let err = sheet.generate(fonts.clone(), dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FontRegistrationFailure);
        assert!(!dir.path().join(sheet.filename).exists());
    }
    Ok(())
}

#[test]
fn test_answer_sections_land_on_their_own_page() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let sheets = Worksheet::all()?;
    let reflect = sheets
        .iter()
        .find(|s| s.filename == "Genki_L19_Worksheet_Reflect.pdf")
        .ok_or("reflect worksheet missing")?;

    let summary = reflect.generate(fixtures::fallback_fonts(), dir.path())?;
    let pdf = GeneratedPdf::from_file(&summary.path)?;
    let last = pdf.page_count() as u32;
    assert_eq!(pdf.shown_text(last).first().map(String::as_str), Some("ANSWER KEY"));
    Ok(())
}
