//! PDF renderer for laid-out pages, built on lopdf.
//!
//! Text in builtin fonts is written with WinAnsiEncoding; registered TrueType
//! faces are embedded so CJK text renders without any viewer-side fonts.

mod content;
mod error;
mod fonts;
mod renderer;

pub use error::RenderError;
pub use fonts::FontResources;
pub use renderer::{PdfRenderer, render_document};
