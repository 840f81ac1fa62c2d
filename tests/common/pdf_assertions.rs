use lopdf::Document as LopdfDocument;
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};

/// Decoded content-stream operations of a 1-based page
pub fn page_operations(doc: &LopdfDocument, page: u32) -> Vec<Operation> {
    let pages = doc.get_pages();
    let Some(page_id) = pages.get(&page) else {
        return Vec::new();
    };
    doc.get_page_content(*page_id)
        .ok()
        .and_then(|bytes| Content::decode(&bytes).ok())
        .map(|content| content.operations)
        .unwrap_or_default()
}

/// Number of times `operator` appears on a page
pub fn count_operator(doc: &LopdfDocument, page: u32, operator: &str) -> usize {
    page_operations(doc, page)
        .iter()
        .filter(|op| op.operator == operator)
        .count()
}

/// Strings shown with `Tj`. Literal strings are WinAnsi text, hex strings are
/// glyph ids and come back as `<gids:N>`.
pub fn shown_text(doc: &LopdfDocument, page: u32) -> Vec<String> {
    page_operations(doc, page)
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, StringFormat::Literal)) => {
                Some(bytes.iter().map(|&b| b as char).collect())
            }
            Some(Object::String(bytes, StringFormat::Hexadecimal)) => {
                Some(format!("<gids:{}>", bytes.len() / 2))
            }
            _ => None,
        })
        .collect()
}

/// BaseFont names of every font dictionary in the file
pub fn font_base_names(doc: &LopdfDocument) -> Vec<String> {
    let mut names: Vec<String> = doc
        .objects
        .values()
        .filter_map(|object| object.as_dict().ok())
        .filter(|dict| {
            dict.get(b"Type")
                .and_then(Object::as_name)
                .is_ok_and(|name| name == b"Font")
        })
        .filter_map(|dict| dict.get(b"BaseFont").and_then(Object::as_name).ok())
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Assert that some shown string on any page contains the text
#[macro_export]
macro_rules! assert_pdf_shows_text {
    ($pdf:expr, $text:expr) => {
        let shown = $pdf.all_shown_text();
        assert!(
            shown.iter().any(|s| s.contains($text)),
            "PDF should show '{}', but shown strings were:\n{:?}",
            $text,
            shown
        );
    };
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}
