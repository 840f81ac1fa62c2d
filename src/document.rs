use crate::error::PipelineError;
use sheets_idf::Block;
use sheets_layout::{FontLibrary, LayoutEngine, Page};
use sheets_render_lopdf::render_document;
use sheets_style::{PageLayout, StyleRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What a finished document looks like. Informational only.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub pages: usize,
    pub blocks: usize,
}

/// Collects blocks for one output file.
///
/// Blocks are kept in append order, which is also render order. Nothing is
/// laid out or written until [`DocumentBuilder::finalize`], which consumes
/// the builder.
pub struct DocumentBuilder {
    target: PathBuf,
    page: PageLayout,
    styles: Arc<StyleRegistry>,
    fonts: Arc<FontLibrary>,
    title: Option<String>,
    blocks: Vec<Block>,
}

impl DocumentBuilder {
    pub fn new(
        target: impl Into<PathBuf>,
        page: PageLayout,
        styles: Arc<StyleRegistry>,
        fonts: Arc<FontLibrary>,
    ) -> Self {
        Self {
            target: target.into(),
            page,
            styles,
            fonts,
            title: None,
            blocks: Vec::new(),
        }
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Appends `block`. Every style it names must already be registered.
    pub fn append(&mut self, block: Block) -> Result<(), PipelineError> {
        for name in block.style_names() {
            self.styles.require(name)?;
        }
        self.blocks.push(block);
        Ok(())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Lays the blocks out onto pages without writing anything.
    pub fn layout(&self) -> Result<Vec<Page>, PipelineError> {
        let engine = LayoutEngine::new(self.fonts.clone(), self.styles.clone(), self.page.clone());
        Ok(engine.paginate(&self.blocks)?)
    }

    /// Lays out, renders and writes the document in one call.
    ///
    /// The file is written only after rendering succeeded in memory.
    pub fn finalize(self) -> Result<RenderSummary, PipelineError> {
        let pages = self.layout()?;
        let mut buffer = Vec::new();
        render_document(
            &pages,
            self.page.page_size(),
            self.title.as_deref(),
            &mut buffer,
        )?;
        std::fs::write(&self.target, &buffer).map_err(|e| PipelineError::io(&self.target, e))?;

        log::debug!(
            "Wrote {} ({} pages, {} bytes)",
            self.target.display(),
            pages.len(),
            buffer.len()
        );
        Ok(RenderSummary {
            path: self.target,
            pages: pages.len(),
            blocks: self.blocks.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use sheets_idf::{ParagraphBlock, TextRole, plain_text};
    use sheets_layout::FallbackPolicy;

    fn builder(target: &Path) -> DocumentBuilder {
        DocumentBuilder::new(
            target,
            PageLayout::a4(72.0),
            Arc::new(StyleRegistry::sample().build().unwrap()),
            Arc::new(FontLibrary::new().with_fallback(FallbackPolicy::Builtin)),
        )
    }

    fn paragraph(style: &str) -> Block {
        Block::Paragraph(ParagraphBlock::new(TextRole::Body, style, plain_text("text")))
    }

    #[test]
    fn unknown_styles_fail_on_append() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = builder(&dir.path().join("out.pdf"));
        let err = doc.append(paragraph("Missing")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DocumentBuildFailure);
        assert!(doc.blocks().is_empty());
    }

    #[test]
    fn finalize_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.pdf");
        let mut doc = builder(&target).with_title("Test");
        doc.append(paragraph("Normal")).unwrap();
        doc.append(Block::PageBreak).unwrap();
        doc.append(paragraph("Heading1")).unwrap();
        let summary = doc.finalize().unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.blocks, 3);
        assert!(std::fs::read(&target).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn unwritable_target_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = builder(&dir.path().join("missing").join("out.pdf"));
        doc.append(paragraph("Normal")).unwrap();
        assert!(matches!(doc.finalize(), Err(PipelineError::Io { .. })));
    }
}
