//! Computed paragraph styles: a named style with its inheritance chain applied.

use crate::fonts::DEFAULT_FONT;
use sheets_idf::SpanStyle;
use sheets_style::{FontStyle, FontWeight, ParagraphStyle, StyleError, StyleRegistry, TextAlign};
use sheets_types::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub font_name: String,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    /// Baseline-to-baseline distance.
    pub leading: f32,
    pub color: Color,
    pub text_align: TextAlign,
    pub space_before: f32,
    pub space_after: f32,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            font_name: DEFAULT_FONT.to_string(),
            font_size: 10.0,
            font_weight: FontWeight::Regular,
            font_style: FontStyle::Normal,
            leading: 12.0,
            color: Color::BLACK,
            text_align: TextAlign::Left,
            space_before: 0.0,
            space_after: 0.0,
        }
    }
}

impl ComputedStyle {
    /// The style of text inside an inline span. Leading stays with the paragraph.
    pub fn with_span(&self, span: &SpanStyle) -> ComputedStyle {
        let mut style = self.clone();
        if let Some(weight) = span.weight {
            style.font_weight = weight;
        }
        if let Some(font_style) = span.style {
            style.font_style = font_style;
        }
        if let Some(color) = &span.color {
            style.color = *color;
        }
        if let Some(size) = span.size {
            style.font_size = size;
        }
        if let Some(face) = &span.face {
            style.font_name = face.clone();
        }
        style
    }
}

/// Resolves `name` against the registry. Ancestors apply first, so the
/// named style's own attributes win.
pub fn compute_style(registry: &StyleRegistry, name: &str) -> Result<ComputedStyle, StyleError> {
    let mut computed = ComputedStyle::default();
    for style in registry.lineage(name)? {
        apply_style_rules(style, &mut computed);
    }
    Ok(computed)
}

fn apply_style_rules(style: &ParagraphStyle, computed: &mut ComputedStyle) {
    if let Some(font_name) = &style.font_name {
        computed.font_name = font_name.clone();
    }
    if let Some(size) = style.font_size {
        computed.font_size = size;
    }
    if let Some(leading) = style.leading {
        computed.leading = leading;
    }
    if let Some(color) = &style.text_color {
        computed.color = *color;
    }
    if let Some(space) = style.space_before {
        computed.space_before = space;
    }
    if let Some(space) = style.space_after {
        computed.space_after = space;
    }
    if let Some(align) = style.alignment {
        computed.text_align = align;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> StyleRegistry {
        StyleRegistry::sample()
            .add(
                ParagraphStyle::new("Header")
                    .parent("Heading2")
                    .font_name("JapaneseFont")
                    .space_before(12.0)
                    .text_color(Color::rgb(0, 0, 139)),
            )
            .add(ParagraphStyle::new("Answer").parent("Header").text_color(Color::rgb(255, 0, 0)))
            .build()
            .unwrap()
    }

    #[test]
    fn child_overrides_and_inherits() {
        let style = compute_style(&registry(), "Header").unwrap();
        assert_eq!(style.font_name, "JapaneseFont");
        assert_eq!(style.font_size, 14.0);
        assert_eq!(style.leading, 18.0);
        assert_eq!(style.space_after, 6.0);
        assert_eq!(style.color, Color::rgb(0, 0, 139));
    }

    #[test]
    fn deeper_chains_keep_the_nearest_value() {
        let style = compute_style(&registry(), "Answer").unwrap();
        assert_eq!(style.color, Color::rgb(255, 0, 0));
        assert_eq!(style.font_name, "JapaneseFont");
        assert_eq!(style.space_before, 12.0);
    }

    #[test]
    fn span_overrides_keep_leading() {
        let base = compute_style(&registry(), "Normal").unwrap();
        let span = SpanStyle {
            weight: Some(FontWeight::Bold),
            size: Some(9.0),
            ..Default::default()
        };
        let styled = base.with_span(&span);
        assert_eq!(styled.font_weight, FontWeight::Bold);
        assert_eq!(styled.font_size, 9.0);
        assert_eq!(styled.leading, base.leading);
    }

    #[test]
    fn unknown_style_is_an_error() {
        assert_eq!(
            compute_style(&registry(), "Missing"),
            Err(StyleError::UnknownStyle("Missing".into()))
        );
    }
}
