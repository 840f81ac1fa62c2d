use genki_sheets::{ContentRenderer, FallbackPolicy, FontLibrary, ParagraphStyle, StyleRegistry};
use std::sync::Arc;

/// The content styles on top of the base sheet, all in builtin fonts.
pub fn styles() -> Arc<StyleRegistry> {
    let registry = StyleRegistry::sample()
        .add(ParagraphStyle::new("Title").parent("Heading1"))
        .add(ParagraphStyle::new("Header").parent("Heading2"))
        .add(ParagraphStyle::new("BodyText").parent("Normal"))
        .add(ParagraphStyle::new("TableCell").parent("Normal"))
        .add(
            ParagraphStyle::new("Japanese")
                .parent("Normal")
                .font_name("JapaneseFont"),
        )
        .build()
        .expect("fixture styles are valid");
    Arc::new(registry)
}

/// Fonts where unregistered families render as Helvetica.
pub fn fallback_fonts() -> Arc<FontLibrary> {
    Arc::new(FontLibrary::new().with_fallback(FallbackPolicy::Builtin))
}

/// Fonts where unregistered families are an error.
pub fn strict_fonts() -> Arc<FontLibrary> {
    Arc::new(FontLibrary::new())
}

pub fn renderer() -> ContentRenderer {
    ContentRenderer::new(styles(), fallback_fonts())
}
