use crate::fonts::FontHandle;
use sheets_types::Color;

/// An element placed on a page. Coordinates are in points from the
/// top-left corner of the page.
#[derive(Clone, Debug)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Index of the block this element was laid out from.
    pub block_index: usize,
    pub element: LayoutElement,
}

#[derive(Clone, Debug)]
pub enum LayoutElement {
    Text(TextElement),
    Rectangle(RectElement),
    Line(LineElement),
}

#[derive(Clone, Debug)]
pub struct TextElement {
    pub content: String,
    pub font: FontHandle,
    pub font_size: f32,
    pub color: Color,
    /// Absolute y of the baseline.
    pub baseline: f32,
    pub synthetic_bold: bool,
    pub synthetic_italic: bool,
}

#[derive(Clone, Debug)]
pub struct RectElement {
    pub fill: Color,
}

/// A stroked segment from `(x, y)` to `(x + width, y + height)`.
#[derive(Clone, Debug)]
pub struct LineElement {
    pub stroke: Color,
    pub line_width: f32,
}

impl PositionedElement {
    pub fn as_text(&self) -> Option<&TextElement> {
        match &self.element {
            LayoutElement::Text(text) => Some(text),
            _ => None,
        }
    }
}
