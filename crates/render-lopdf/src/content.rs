//! Drawing of laid-out elements into a page content stream.

use crate::fonts::FontResources;
use lopdf::Object;
use lopdf::content::{Content, Operation};
use sheets_layout::{LayoutElement, LineElement, PositionedElement, RectElement, TextElement};
use sheets_types::Color;

/// Horizontal shear used to slant text when no italic face exists.
const ITALIC_SHEAR: f32 = 0.21;
/// Outline width for synthetic bold, relative to the font size.
const BOLD_STROKE: f32 = 0.03;

#[derive(Default, Clone, PartialEq)]
struct RenderState {
    font_name: String,
    font_size: f32,
    fill_color: Option<Color>,
    stroke_color: Option<Color>,
    line_width: Option<f32>,
    render_mode: i64,
}

/// Per-page drawing context. Layout coordinates grow downward from the top
/// of the page; PDF coordinates grow upward, so every y is flipped.
pub(crate) struct PageContext<'a> {
    page_height: f32,
    content: Content,
    state: RenderState,
    fonts: &'a mut FontResources,
}

fn color_operands(color: &Color) -> Vec<Object> {
    color.to_unit_rgb().into_iter().map(Object::Real).collect()
}

impl<'a> PageContext<'a> {
    pub(crate) fn new(page_height: f32, fonts: &'a mut FontResources) -> Self {
        Self {
            page_height,
            content: Content { operations: vec![] },
            state: RenderState::default(),
            fonts,
        }
    }

    pub(crate) fn finish(self) -> Content {
        self.content
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn flip_y(&self, y: f32) -> f32 {
        self.page_height - y
    }

    pub(crate) fn draw_element(&mut self, el: &PositionedElement) {
        match &el.element {
            LayoutElement::Rectangle(rect) => self.draw_rect(rect, el),
            LayoutElement::Line(line) => self.draw_line(line, el),
            LayoutElement::Text(text) => self.draw_text(text, el),
        }
    }

    fn set_fill_color(&mut self, color: &Color) {
        if self.state.fill_color.as_ref() != Some(color) {
            self.push("rg", color_operands(color));
            self.state.fill_color = Some(*color);
        }
    }

    fn set_stroke_color(&mut self, color: &Color) {
        if self.state.stroke_color.as_ref() != Some(color) {
            self.push("RG", color_operands(color));
            self.state.stroke_color = Some(*color);
        }
    }

    fn set_line_width(&mut self, width: f32) {
        if self.state.line_width != Some(width) {
            self.push("w", vec![width.into()]);
            self.state.line_width = Some(width);
        }
    }

    fn set_render_mode(&mut self, mode: i64) {
        if self.state.render_mode != mode {
            self.push("Tr", vec![mode.into()]);
            self.state.render_mode = mode;
        }
    }

    fn draw_rect(&mut self, rect: &RectElement, el: &PositionedElement) {
        self.set_fill_color(&rect.fill);
        let y = self.flip_y(el.y + el.height);
        self.push(
            "re",
            vec![el.x.into(), y.into(), el.width.into(), el.height.into()],
        );
        self.push("f", vec![]);
    }

    fn draw_line(&mut self, line: &LineElement, el: &PositionedElement) {
        self.set_line_width(line.line_width);
        self.set_stroke_color(&line.stroke);
        let (x1, y1) = (el.x, self.flip_y(el.y));
        let (x2, y2) = (el.x + el.width, self.flip_y(el.y + el.height));
        self.push("m", vec![x1.into(), y1.into()]);
        self.push("l", vec![x2.into(), y2.into()]);
        self.push("S", vec![]);
    }

    fn draw_text(&mut self, text: &TextElement, el: &PositionedElement) {
        if text.content.trim().is_empty() {
            return;
        }
        let (font_name, operand) = self.fonts.encode(&text.font, &text.content);

        self.push("BT", vec![]);
        if self.state.font_name != font_name || self.state.font_size != text.font_size {
            self.push(
                "Tf",
                vec![Object::Name(font_name.as_bytes().to_vec()), text.font_size.into()],
            );
            self.state.font_name = font_name;
            self.state.font_size = text.font_size;
        }
        self.set_fill_color(&text.color);
        if text.synthetic_bold {
            self.set_stroke_color(&text.color);
            self.set_line_width(text.font_size * BOLD_STROKE);
            self.set_render_mode(2);
        } else {
            self.set_render_mode(0);
        }

        let shear = if text.synthetic_italic { ITALIC_SHEAR } else { 0.0 };
        let baseline = self.flip_y(text.baseline);
        self.push(
            "Tm",
            vec![
                1.into(),
                0.into(),
                shear.into(),
                1.into(),
                el.x.into(),
                baseline.into(),
            ],
        );
        self.push("Tj", vec![operand]);
        self.push("ET", vec![]);
    }
}
