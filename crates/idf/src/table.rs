use crate::ParagraphBlock;
use sheets_style::TableStyle;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Table has no rows")]
    NoRows,
    #[error("Table has no columns")]
    NoColumns,
    #[error("Row {row} has {found} cells but the table has {expected} column widths")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Column {column} has invalid width {width}")]
    InvalidWidth { column: usize, width: f32 },
}

/// Checks that every row has exactly one cell per column width.
///
/// Rows are never padded or truncated to fit.
pub fn check_grid_shape(
    row_lengths: impl IntoIterator<Item = usize>,
    widths: &[f32],
) -> Result<(), TableError> {
    if widths.is_empty() {
        return Err(TableError::NoColumns);
    }
    if let Some((column, &width)) = widths
        .iter()
        .enumerate()
        .find(|(_, w)| !(w.is_finite() && **w > 0.0))
    {
        return Err(TableError::InvalidWidth { column, width });
    }

    let mut rows = 0;
    for (row, found) in row_lengths.into_iter().enumerate() {
        if found != widths.len() {
            return Err(TableError::RaggedRow {
                row,
                expected: widths.len(),
                found,
            });
        }
        rows += 1;
    }
    if rows == 0 {
        return Err(TableError::NoRows);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<ParagraphBlock>,
    pub is_header: bool,
}

/// A validated grid of cell paragraphs. Row 0 is the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    rows: Vec<TableRow>,
    column_widths: Vec<f32>,
    style: TableStyle,
}

impl TableBlock {
    pub fn new(
        rows: Vec<Vec<ParagraphBlock>>,
        column_widths: Vec<f32>,
        style: TableStyle,
    ) -> Result<Self, TableError> {
        check_grid_shape(rows.iter().map(Vec::len), &column_widths)?;
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| TableRow {
                cells,
                is_header: i == 0,
            })
            .collect();
        Ok(Self {
            rows,
            column_widths,
            style,
        })
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn column_widths(&self) -> &[f32] {
        &self.column_widths
    }

    pub fn style(&self) -> &TableStyle {
        &self.style
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn total_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    pub fn is_header_row(&self, index: usize) -> bool {
        self.rows.get(index).is_some_and(|row| row.is_header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TextRole, plain_text};

    fn cell(text: &str) -> ParagraphBlock {
        ParagraphBlock::new(TextRole::Cell, "TableCell", plain_text(text))
    }

    #[test]
    fn only_row_zero_is_header() {
        let table = TableBlock::new(
            vec![vec![cell("H1"), cell("H2")], vec![cell("a"), cell("b")], vec![cell("c"), cell("d")]],
            vec![100.0, 100.0],
            TableStyle::default(),
        )
        .unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert!(table.is_header_row(0));
        assert!(!table.is_header_row(1));
        assert!(!table.is_header_row(2));
        assert!(!table.is_header_row(3));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = TableBlock::new(
            vec![vec![cell("H1"), cell("H2")], vec![cell("a")]],
            vec![100.0, 100.0],
            TableStyle::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            TableError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn width_count_must_match_rows() {
        let err = check_grid_shape([3, 3], &[100.0, 100.0]).unwrap_err();
        assert_eq!(
            err,
            TableError::RaggedRow {
                row: 0,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn empty_and_degenerate_grids_are_rejected() {
        assert_eq!(check_grid_shape(Vec::<usize>::new(), &[10.0]), Err(TableError::NoRows));
        assert_eq!(check_grid_shape([0], &[]), Err(TableError::NoColumns));
        assert!(matches!(
            check_grid_shape([2], &[10.0, -1.0]),
            Err(TableError::InvalidWidth { column: 1, .. })
        ));
    }
}
