//! Content descriptors: the declarative, pre-render description of a worksheet.

use serde::{Deserialize, Serialize};
use sheets_idf::{TableError, check_grid_shape};

pub const TITLE_STYLE: &str = "Title";
pub const HEADER_STYLE: &str = "Header";
pub const TEXT_STYLE: &str = "BodyText";
pub const DEFAULT_SPACER_HEIGHT: f32 = 15.0;

fn title_style() -> String {
    TITLE_STYLE.to_string()
}

fn header_style() -> String {
    HEADER_STYLE.to_string()
}

fn text_style() -> String {
    TEXT_STYLE.to_string()
}

fn spacer_height() -> f32 {
    DEFAULT_SPACER_HEIGHT
}

/// One piece of document content. Items render in sequence order.
///
/// Text-bearing items hold inline markup (`<b>`, `<i>`, `<font>`, `<br/>`,
/// entities) and name the paragraph style they render with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentItem {
    Title {
        text: String,
        #[serde(default = "title_style")]
        style: String,
    },
    Header {
        text: String,
        #[serde(default = "header_style")]
        style: String,
    },
    Text {
        text: String,
        #[serde(default = "text_style")]
        style: String,
    },
    Table(TableContent),
    Spacer {
        #[serde(default = "spacer_height")]
        height: f32,
    },
    #[serde(alias = "break")]
    PageBreak,
}

impl ContentItem {
    pub fn title(text: impl Into<String>) -> Self {
        ContentItem::Title {
            text: text.into(),
            style: title_style(),
        }
    }

    pub fn header(text: impl Into<String>) -> Self {
        ContentItem::Header {
            text: text.into(),
            style: header_style(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::styled_text(text, TEXT_STYLE)
    }

    pub fn styled_text(text: impl Into<String>, style: impl Into<String>) -> Self {
        ContentItem::Text {
            text: text.into(),
            style: style.into(),
        }
    }

    pub fn table(table: TableContent) -> Self {
        ContentItem::Table(table)
    }

    pub fn spacer(height: f32) -> Self {
        ContentItem::Spacer { height }
    }

    pub fn page_break() -> Self {
        ContentItem::PageBreak
    }
}

/// A table cell: literal text, or a markup paragraph with an optional style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Plain(String),
    Formatted {
        markup: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
    },
}

impl CellValue {
    pub fn formatted(markup: impl Into<String>) -> Self {
        CellValue::Formatted {
            markup: markup.into(),
            style: None,
        }
    }

    pub fn formatted_with(markup: impl Into<String>, style: impl Into<String>) -> Self {
        CellValue::Formatted {
            markup: markup.into(),
            style: Some(style.into()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::Plain(text.to_string())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTable {
    data: Vec<Vec<CellValue>>,
    widths: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cell_style: Option<String>,
}

/// A grid of cells with one width per column. Row 0 is the header row.
/// Every row has exactly as many cells as there are widths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable", into = "RawTable")]
pub struct TableContent {
    rows: Vec<Vec<CellValue>>,
    column_widths: Vec<f32>,
    cell_style: Option<String>,
}

impl TryFrom<RawTable> for TableContent {
    type Error = TableError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        let table = TableContent::new(raw.data, raw.widths)?;
        Ok(match raw.cell_style {
            Some(style) => table.with_cell_style(style),
            None => table,
        })
    }
}

impl From<TableContent> for RawTable {
    fn from(table: TableContent) -> Self {
        RawTable {
            data: table.rows,
            widths: table.column_widths,
            cell_style: table.cell_style,
        }
    }
}

impl TableContent {
    pub fn new(rows: Vec<Vec<CellValue>>, column_widths: Vec<f32>) -> Result<Self, TableError> {
        check_grid_shape(rows.iter().map(Vec::len), &column_widths)?;
        Ok(Self {
            rows,
            column_widths,
            cell_style: None,
        })
    }

    /// Builds a table of plain-text cells.
    pub fn plain(rows: &[&[&str]], column_widths: &[f32]) -> Result<Self, TableError> {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|&cell| CellValue::from(cell)).collect())
            .collect();
        Self::new(rows, column_widths.to_vec())
    }

    /// Builds a table whose every cell is a markup paragraph.
    pub fn formatted(rows: &[&[&str]], column_widths: &[f32]) -> Result<Self, TableError> {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|&cell| CellValue::formatted(cell)).collect())
            .collect();
        Self::new(rows, column_widths.to_vec())
    }

    /// Style for cells that do not name their own, instead of the renderer's default.
    pub fn with_cell_style(mut self, style: impl Into<String>) -> Self {
        self.cell_style = Some(style.into());
        self
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn column_widths(&self) -> &[f32] {
        &self.column_widths
    }

    pub fn cell_style(&self) -> Option<&str> {
        self.cell_style.as_deref()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_deserialize_from_tagged_maps() {
        let json = r#"[
            {"type": "title", "text": "Genki II L19"},
            {"type": "header", "text": "I. Respectful Advice", "style": "HeaderJP"},
            {"type": "text", "text": "<b>A:</b> This bag is heavy..."},
            {"type": "table", "data": [["H1", "H2"], ["a", {"markup": "<b>b</b>"}]], "widths": [150, 200]},
            {"type": "spacer"},
            {"type": "break"},
            {"type": "page-break"}
        ]"#;
        let items: Vec<ContentItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items[0], ContentItem::title("Genki II L19"));
        assert_eq!(items[1], ContentItem::Header {
            text: "I. Respectful Advice".into(),
            style: "HeaderJP".into()
        });
        assert_eq!(items[2], ContentItem::text("<b>A:</b> This bag is heavy..."));
        match &items[3] {
            ContentItem::Table(table) => {
                assert_eq!(table.row_count(), 2);
                assert_eq!(table.column_widths(), &[150.0, 200.0]);
                assert_eq!(table.rows()[1][1], CellValue::formatted("<b>b</b>"));
            }
            other => panic!("expected a table, got {other:?}"),
        }
        assert_eq!(items[4], ContentItem::spacer(15.0));
        assert_eq!(items[5], ContentItem::PageBreak);
        assert_eq!(items[6], ContentItem::PageBreak);
    }

    #[test]
    fn ragged_tables_are_rejected_when_deserializing() {
        let json = r#"{"type": "table", "data": [["H1", "H2"], ["a"]], "widths": [100, 100]}"#;
        let err = serde_json::from_str::<ContentItem>(json).unwrap_err();
        assert!(err.to_string().contains("Row 1 has 1 cells"));
    }

    #[test]
    fn width_count_must_match_rows() {
        assert_eq!(
            TableContent::plain(&[&["H1", "H2"]], &[100.0]),
            Err(TableError::RaggedRow {
                row: 0,
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn tables_serialize_in_the_raw_shape() {
        let table = TableContent::plain(&[&["H1"], &["a"]], &[100.0])
            .unwrap()
            .with_cell_style("TableText");
        let value = serde_json::to_value(ContentItem::table(table)).unwrap();
        assert_eq!(value["type"], "table");
        assert_eq!(value["cellStyle"], "TableText");
        assert_eq!(value["data"][1][0], "a");
    }
}
