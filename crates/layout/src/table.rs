use crate::elements::{LayoutElement, LineElement, PositionedElement, RectElement};
use crate::style::compute_style;
use crate::text::{ParagraphLayout, layout_paragraph};
use crate::{FontLibrary, LayoutError};
use sheets_idf::TableBlock;
use sheets_style::{StyleRegistry, TableStyle};
use std::ops::Range;

#[derive(Debug, Clone)]
pub struct RowLayout {
    pub cells: Vec<ParagraphLayout>,
    pub height: f32,
    pub is_header: bool,
}

/// A table with every cell broken into lines. Rows are measured but not yet placed.
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub rows: Vec<RowLayout>,
    pub column_widths: Vec<f32>,
    pub style: TableStyle,
}

pub fn layout_table(
    fonts: &FontLibrary,
    styles: &StyleRegistry,
    table: &TableBlock,
) -> Result<TableLayout, LayoutError> {
    let style = table.style().clone();
    let padding = style.padding;
    let mut rows = Vec::with_capacity(table.row_count());

    for row in table.rows() {
        let mut cells = Vec::with_capacity(row.cells.len());
        let mut content_height: f32 = 0.0;
        for (cell, &column_width) in row.cells.iter().zip(table.column_widths()) {
            let computed = compute_style(styles, &cell.style)?;
            let inner_width = (column_width - 2.0 * padding).max(1.0);
            let paragraph = layout_paragraph(fonts, &computed, &cell.inlines, inner_width)?;
            content_height = content_height.max(paragraph.height());
            cells.push(paragraph);
        }
        rows.push(RowLayout {
            cells,
            height: content_height + 2.0 * padding,
            is_header: row.is_header,
        });
    }

    Ok(TableLayout {
        rows,
        column_widths: table.column_widths().to_vec(),
        style,
    })
}

impl TableLayout {
    pub fn width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    pub fn rows_height(&self, rows: Range<usize>) -> f32 {
        self.rows[rows].iter().map(|r| r.height).sum()
    }

    /// Places `rows` with the first row's top edge at `top`. Each slice gets
    /// its own top border so a table split across pages stays closed.
    pub fn place_rows(
        &self,
        rows: Range<usize>,
        x: f32,
        top: f32,
        block_index: usize,
    ) -> Vec<PositionedElement> {
        let mut elements = Vec::new();
        let padding = self.style.padding;
        let width = self.width();
        let height = self.rows_height(rows.clone());

        let mut y = top;
        for row in &self.rows[rows.clone()] {
            if row.is_header {
                elements.push(PositionedElement {
                    x,
                    y,
                    width,
                    height: row.height,
                    block_index,
                    element: LayoutElement::Rectangle(RectElement {
                        fill: self.style.header_background,
                    }),
                });
            }

            let mut cell_x = x;
            for (cell, column_width) in row.cells.iter().zip(&self.column_widths) {
                let available = row.height - 2.0 * padding;
                let offset = self.style.vertical_align.offset(available, cell.height());
                elements.extend(cell.place_lines(
                    0..cell.lines.len(),
                    cell_x + padding,
                    y + padding + offset,
                    block_index,
                ));
                cell_x += column_width;
            }
            y += row.height;
        }

        let mut rule = |x: f32, y: f32, width: f32, height: f32| {
            elements.push(PositionedElement {
                x,
                y,
                width,
                height,
                block_index,
                element: LayoutElement::Line(LineElement {
                    stroke: self.style.grid_color,
                    line_width: self.style.grid_width,
                }),
            });
        };

        rule(x, top, width, 0.0);
        let mut y = top;
        for row in &self.rows[rows] {
            y += row.height;
            rule(x, y, width, 0.0);
        }
        rule(x, top, 0.0, height);
        let mut column_x = x;
        for column_width in &self.column_widths {
            column_x += column_width;
            rule(column_x, top, 0.0, height);
        }

        elements
    }
}
