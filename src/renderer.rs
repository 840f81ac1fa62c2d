use crate::content::{CellValue, ContentItem, TableContent};
use crate::document::{DocumentBuilder, RenderSummary};
use crate::error::PipelineError;
use sheets_idf::{
    Block, ParagraphBlock, TableBlock, TextRole, flatten_text, parse_markup, plain_text,
};
use sheets_layout::FontLibrary;
use sheets_style::{PageLayout, StyleRegistry, TableStyle};
use std::path::PathBuf;
use std::sync::Arc;

/// Turns content lists into documents.
///
/// Styles and fonts are shared, immutable inputs; the renderer holds no
/// per-document state, so one instance can render any number of files.
pub struct ContentRenderer {
    styles: Arc<StyleRegistry>,
    fonts: Arc<FontLibrary>,
    table_style: TableStyle,
}

impl ContentRenderer {
    pub fn new(styles: Arc<StyleRegistry>, fonts: Arc<FontLibrary>) -> Self {
        Self {
            styles,
            fonts,
            table_style: TableStyle::default(),
        }
    }

    /// The grid, shading, padding and alignment every table receives.
    pub fn with_table_style(mut self, table_style: TableStyle) -> Self {
        self.table_style = table_style;
        self
    }

    /// Appends the blocks for `items` to `doc`, in order.
    pub fn append_items(
        &self,
        items: &[ContentItem],
        doc: &mut DocumentBuilder,
    ) -> Result<(), PipelineError> {
        for item in items {
            match item {
                ContentItem::Title { text, style } => {
                    doc.append(paragraph(TextRole::Title, style, text)?)?
                }
                ContentItem::Header { text, style } => {
                    doc.append(paragraph(TextRole::Header, style, text)?)?
                }
                ContentItem::Text { text, style } => {
                    doc.append(paragraph(TextRole::Body, style, text)?)?
                }
                ContentItem::Table(table) => {
                    doc.append(Block::Table(self.table_block(table)?))?;
                    doc.append(Block::Spacer {
                        height: self.table_style.trailing_space,
                    })?;
                }
                ContentItem::Spacer { height } => doc.append(Block::Spacer { height: *height })?,
                ContentItem::PageBreak => doc.append(Block::PageBreak)?,
            }
        }
        Ok(())
    }

    fn table_block(&self, table: &TableContent) -> Result<TableBlock, PipelineError> {
        let default_style = table.cell_style().unwrap_or(self.table_style.cell_style.as_str());
        let rows = table
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell_paragraph(cell, default_style))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TableBlock::new(
            rows,
            table.column_widths().to_vec(),
            self.table_style.clone(),
        )?)
    }

    /// Builds, lays out and writes one document from `items`.
    pub fn render(
        &self,
        items: &[ContentItem],
        target: impl Into<PathBuf>,
        page: PageLayout,
    ) -> Result<RenderSummary, PipelineError> {
        let mut doc = DocumentBuilder::new(target, page, self.styles.clone(), self.fonts.clone());
        if let Some(title) = document_title(items)? {
            doc = doc.with_title(title);
        }
        log::debug!("Rendering {} content items to {}", items.len(), doc.target().display());
        self.append_items(items, &mut doc)?;
        doc.finalize()
    }
}

fn paragraph(role: TextRole, style: &str, markup: &str) -> Result<Block, PipelineError> {
    Ok(Block::Paragraph(ParagraphBlock::new(
        role,
        style,
        parse_markup(markup)?,
    )))
}

fn cell_paragraph(cell: &CellValue, default_style: &str) -> Result<ParagraphBlock, PipelineError> {
    Ok(match cell {
        CellValue::Plain(text) => ParagraphBlock::new(TextRole::Cell, default_style, plain_text(text)),
        CellValue::Formatted { markup, style } => ParagraphBlock::new(
            TextRole::Cell,
            style.as_deref().unwrap_or(default_style),
            parse_markup(markup)?,
        ),
    })
}

/// The plain text of the first title item, for the document metadata.
fn document_title(items: &[ContentItem]) -> Result<Option<String>, PipelineError> {
    for item in items {
        if let ContentItem::Title { text, .. } = item {
            return Ok(Some(flatten_text(&parse_markup(text)?)));
        }
    }
    Ok(None)
}

/// Renders `items` with the default table treatment.
pub fn render_content_list(
    items: &[ContentItem],
    target: impl Into<PathBuf>,
    page: PageLayout,
    styles: Arc<StyleRegistry>,
    fonts: Arc<FontLibrary>,
) -> Result<RenderSummary, PipelineError> {
    ContentRenderer::new(styles, fonts).render(items, target, page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheets_layout::FallbackPolicy;
    use sheets_style::ParagraphStyle;

    fn renderer() -> ContentRenderer {
        let styles = StyleRegistry::sample()
            .add(ParagraphStyle::new("Title").parent("Heading1"))
            .add(ParagraphStyle::new("Header").parent("Heading2"))
            .add(ParagraphStyle::new("BodyText").parent("Normal"))
            .add(ParagraphStyle::new("TableCell").parent("Normal"))
            .build()
            .unwrap();
        ContentRenderer::new(
            Arc::new(styles),
            Arc::new(FontLibrary::new().with_fallback(FallbackPolicy::Builtin)),
        )
    }

    fn builder(renderer: &ContentRenderer) -> DocumentBuilder {
        DocumentBuilder::new(
            "unused.pdf",
            PageLayout::a4(72.0),
            renderer.styles.clone(),
            renderer.fonts.clone(),
        )
    }

    #[test]
    fn tables_are_followed_by_the_trailing_spacer() {
        let renderer = renderer().with_table_style(TableStyle::default().trailing_space(20.0));
        let mut doc = builder(&renderer);
        let table = TableContent::plain(&[&["H1", "H2"], &["a", "b"]], &[100.0, 100.0]).unwrap();
        renderer
            .append_items(&[ContentItem::table(table)], &mut doc)
            .unwrap();
        let kinds: Vec<_> = doc.blocks().iter().map(Block::kind).collect();
        assert_eq!(kinds, vec!["table", "spacer"]);
        assert_eq!(doc.blocks()[1], Block::Spacer { height: 20.0 });
    }

    #[test]
    fn cells_use_the_table_cell_style_unless_overridden() {
        let renderer = renderer();
        let mut doc = builder(&renderer);
        let table = TableContent::new(
            vec![vec!["H".into(), CellValue::formatted_with("<b>x</b>", "BodyText")]],
            vec![100.0, 100.0],
        )
        .unwrap();
        renderer
            .append_items(&[ContentItem::table(table)], &mut doc)
            .unwrap();
        let Block::Table(block) = &doc.blocks()[0] else {
            panic!("expected a table block");
        };
        assert_eq!(block.rows()[0].cells[0].style, "TableCell");
        assert_eq!(block.rows()[0].cells[1].style, "BodyText");
    }

    #[test]
    fn plain_cells_are_not_parsed_as_markup() {
        let renderer = renderer();
        let mut doc = builder(&renderer);
        let table = TableContent::plain(&[&["a <b> c"]], &[100.0]).unwrap();
        renderer
            .append_items(&[ContentItem::table(table)], &mut doc)
            .unwrap();
        let Block::Table(block) = &doc.blocks()[0] else {
            panic!("expected a table block");
        };
        assert_eq!(block.rows()[0].cells[0].text(), "a <b> c");
    }

    #[test]
    fn unknown_style_stops_the_run() {
        let renderer = renderer();
        let mut doc = builder(&renderer);
        let items = [
            ContentItem::text("ok"),
            ContentItem::styled_text("bad", "NoSuchStyle"),
            ContentItem::text("never appended"),
        ];
        assert!(renderer.append_items(&items, &mut doc).is_err());
        assert_eq!(doc.blocks().len(), 1);
    }

    #[test]
    fn title_metadata_drops_markup() {
        let items = [ContentItem::text("x"), ContentItem::title("<b>ANSWER KEY</b>: L20")];
        assert_eq!(document_title(&items).unwrap().as_deref(), Some("ANSWER KEY: L20"));
    }
}
