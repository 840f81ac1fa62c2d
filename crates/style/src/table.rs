use crate::text::VerticalAlign;
use serde::{Deserialize, Serialize};
use sheets_types::Color;

/// The visual treatment every table in a document receives.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TableStyle {
    /// Paragraph style applied to cells that do not name their own.
    pub cell_style: String,
    pub grid_width: f32,
    pub grid_color: Color,
    /// Fill behind the header row (row 0).
    pub header_background: Color,
    pub padding: f32,
    pub vertical_align: VerticalAlign,
    /// Height of the spacer appended after each table.
    pub trailing_space: f32,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            cell_style: "TableCell".to_string(),
            grid_width: 1.0,
            grid_color: Color::BLACK,
            header_background: Color::gray(211),
            padding: 6.0,
            vertical_align: VerticalAlign::Middle,
            trailing_space: 12.0,
        }
    }
}

impl TableStyle {
    pub fn cell_style(mut self, name: impl Into<String>) -> Self {
        self.cell_style = name.into();
        self
    }

    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn vertical_align(mut self, align: VerticalAlign) -> Self {
        self.vertical_align = align;
        self
    }

    pub fn trailing_space(mut self, space: f32) -> Self {
        self.trailing_space = space;
        self
    }
}
