//! The Genki II worksheets, each a content list plus its own page, style
//! and table settings.

mod honorifics;
mod lesson19;
mod lesson20;

use crate::assets::FONT_FAMILY;
use crate::content::ContentItem;
use crate::document::RenderSummary;
use crate::error::PipelineError;
use crate::renderer::ContentRenderer;
use sheets_layout::FontLibrary;
use sheets_style::{PageLayout, ParagraphStyle, StyleError, StyleRegistry, TableStyle};
use std::path::Path;
use std::sync::Arc;

/// Answer line used in table cells.
const BLANK: &str = "__________________";
const NAME_DATE: &str = "Name: __________________________   Date: ____________";

/// One output document.
#[derive(Debug, Clone)]
pub struct Worksheet {
    pub filename: &'static str,
    pub page: PageLayout,
    pub styles: Arc<StyleRegistry>,
    pub table_style: TableStyle,
    pub content: Vec<ContentItem>,
    /// Only worth producing with the real Japanese font.
    pub requires_font: bool,
}

impl Worksheet {
    /// Every worksheet, in generation order.
    pub fn all() -> Result<Vec<Worksheet>, PipelineError> {
        Ok(vec![
            honorifics::worksheet()?,
            honorifics::answer_key()?,
            lesson19::interact()?,
            lesson19::reflect()?,
            lesson20::extra_modest()?,
            lesson20::review()?,
        ])
    }

    /// Renders into `output_dir`, overwriting any earlier file of the same name.
    pub fn generate(
        &self,
        fonts: Arc<FontLibrary>,
        output_dir: &Path,
    ) -> Result<RenderSummary, PipelineError> {
        ContentRenderer::new(self.styles.clone(), fonts)
            .with_table_style(self.table_style.clone())
            .render(&self.content, output_dir.join(self.filename), self.page.clone())
    }
}

/// A style in the Japanese font family, inheriting from `parent`.
fn jp(name: &str, parent: &str) -> ParagraphStyle {
    ParagraphStyle::new(name).parent(parent).font_name(FONT_FAMILY)
}

/// The base sheet, a plain-cell style, and the worksheet's own styles.
fn registry(
    styles: impl IntoIterator<Item = ParagraphStyle>,
) -> Result<Arc<StyleRegistry>, StyleError> {
    let builder = StyleRegistry::sample().add(jp("TableCell", "Normal"));
    let registry = styles
        .into_iter()
        .fold(builder, |builder, style| builder.add(style))
        .build()?;
    Ok(Arc::new(registry))
}
