//! Renders ordered content lists (titles, headers, marked-up text, tables,
//! spacers and page breaks) into paginated A4 PDFs, and ships the Genki II
//! honorifics worksheets built on top of it.

pub mod assets;
pub mod config;
pub mod content;
pub mod document;
pub mod error;
pub mod renderer;
pub mod worksheets;

pub use assets::{AssetFetcher, FontAsset, FontOutcome, FontSetup, OfflineFetcher, install_font};
#[cfg(feature = "download")]
pub use assets::HttpFetcher;
pub use config::GenerationConfig;
pub use content::{CellValue, ContentItem, TableContent};
pub use document::{DocumentBuilder, RenderSummary};
pub use error::{ErrorKind, PipelineError};
pub use renderer::{ContentRenderer, render_content_list};
pub use worksheets::Worksheet;

pub use sheets_layout::{FallbackPolicy, FontLibrary};
pub use sheets_style::{PageLayout, ParagraphStyle, StyleRegistry, TableStyle};
