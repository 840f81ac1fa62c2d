use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Node has a height of {0:.2} which exceeds the total page content height of {1:.2}.")]
    ElementTooLarge(f32, f32),
    #[error(transparent)]
    Font(#[from] FontError),
    #[error(transparent)]
    Style(#[from] StyleError),
}

pub mod afm;
pub mod elements;
pub mod engine;
pub mod fonts;
pub mod style;
pub mod table;
pub mod text;

pub use self::elements::{LayoutElement, LineElement, PositionedElement, RectElement, TextElement};
pub use self::engine::{LayoutEngine, Page};
pub use self::fonts::{
    BuiltinFont, DEFAULT_FONT, FallbackPolicy, FontError, FontHandle, FontLibrary, MappedGlyph,
    TrueTypeFace,
};
pub use self::style::{ComputedStyle, compute_style};
pub use self::table::{TableLayout, layout_table};
pub use self::text::{ParagraphLayout, layout_paragraph};

use sheets_style::StyleError;

#[cfg(test)]
mod test_utils;
