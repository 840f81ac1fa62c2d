//! Intermediate Document Format (IDF)
//! The in-memory representation of a document's blocks after content items
//! have been interpreted but before layout.

pub mod markup;
pub mod table;

pub use markup::{InlineNode, MarkupError, SpanStyle, flatten_text, parse_markup, plain_text};
pub use table::{TableBlock, TableError, TableRow, check_grid_shape};

/// Which kind of content produced a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRole {
    Title,
    Header,
    Body,
    /// A paragraph wrapped around a table cell value.
    Cell,
}

/// A run of formatted text rendered with one named paragraph style.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphBlock {
    pub role: TextRole,
    pub style: String,
    pub inlines: Vec<InlineNode>,
}

impl ParagraphBlock {
    pub fn new(role: TextRole, style: impl Into<String>, inlines: Vec<InlineNode>) -> Self {
        Self {
            role,
            style: style.into(),
            inlines,
        }
    }

    /// The paragraph's text with markup removed and breaks as newlines.
    pub fn text(&self) -> String {
        flatten_text(&self.inlines)
    }
}

/// A unit of visual content, appended to a document in render order.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(ParagraphBlock),
    Table(TableBlock),
    /// Blank vertical space.
    Spacer { height: f32 },
    /// Forces the next block onto a new page.
    PageBreak,
}

impl Block {
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Table(_) => "table",
            Block::Spacer { .. } => "spacer",
            Block::PageBreak => "page-break",
        }
    }

    /// Every paragraph style this block renders with, cells included.
    pub fn style_names(&self) -> Vec<&str> {
        match self {
            Block::Paragraph(p) => vec![p.style.as_str()],
            Block::Table(t) => t
                .rows()
                .iter()
                .flat_map(|row| row.cells.iter().map(|c| c.style.as_str()))
                .collect(),
            Block::Spacer { .. } | Block::PageBreak => Vec::new(),
        }
    }
}
