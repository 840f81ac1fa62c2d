use sheets_idf::{ParagraphBlock, TextRole, plain_text};
use sheets_style::{ParagraphStyle, StyleRegistry};

pub fn sample_styles() -> StyleRegistry {
    StyleRegistry::sample()
        .add(ParagraphStyle::new("TableCell").parent("Normal"))
        .build()
        .unwrap()
}

pub fn cell(text: &str) -> ParagraphBlock {
    ParagraphBlock::new(TextRole::Cell, "TableCell", plain_text(text))
}

pub fn body(text: &str) -> ParagraphBlock {
    ParagraphBlock::new(TextRole::Body, "Normal", plain_text(text))
}
