pub mod dimension;
pub mod font;
pub mod paragraph;
pub mod stylesheet;
pub mod table;
pub mod text;

pub use dimension::{Margins, PageSize};
pub use font::{FontStyle, FontWeight};
pub use paragraph::ParagraphStyle;
pub use stylesheet::{PageLayout, StyleError, StyleRegistry, StyleRegistryBuilder};
pub use table::TableStyle;
pub use text::{TextAlign, VerticalAlign};
