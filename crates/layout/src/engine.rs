use crate::elements::PositionedElement;
use crate::fonts::FontLibrary;
use crate::style::compute_style;
use crate::table::layout_table;
use crate::text::layout_paragraph;
use crate::LayoutError;
use sheets_idf::{Block, ParagraphBlock, TableBlock};
use sheets_style::{PageLayout, StyleRegistry};
use sheets_types::Rect;
use std::sync::Arc;

const EPSILON: f32 = 0.01;

/// One finished page. Coordinates are relative to the page's top-left corner.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub elements: Vec<PositionedElement>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Indices of the blocks with content on this page, in first-seen order.
    pub fn block_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = Vec::new();
        for element in &self.elements {
            if !indices.contains(&element.block_index) {
                indices.push(element.block_index);
            }
        }
        indices
    }
}

/// Tracks the flow position inside the content frame of the current page.
struct PageCursor {
    frame: Rect,
    pages: Vec<Page>,
    current: Page,
    /// Offset from the top of the frame.
    y: f32,
    /// True once anything, even blank space, has been placed on the page.
    used: bool,
    last_space_after: f32,
}

impl PageCursor {
    fn new(frame: Rect) -> Self {
        Self {
            frame,
            pages: Vec::new(),
            current: Page::default(),
            y: 0.0,
            used: false,
            last_space_after: 0.0,
        }
    }

    fn remaining(&self) -> f32 {
        (self.frame.height - self.y).max(0.0)
    }

    fn fits(&self, height: f32) -> bool {
        height <= self.remaining() + EPSILON
    }

    fn top(&self) -> f32 {
        self.frame.y + self.y
    }

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        log::trace!("Finished page {} with {} elements", self.pages.len() + 1, page.elements.len());
        self.pages.push(page);
        self.y = 0.0;
        self.used = false;
        self.last_space_after = 0.0;
    }

    fn place(&mut self, elements: Vec<PositionedElement>, height: f32) {
        self.current.elements.extend(elements);
        self.y += height;
        self.used = true;
    }

    /// Blank space; never carried over to the next page.
    fn advance(&mut self, height: f32) {
        self.y = (self.y + height).min(self.frame.height);
        self.used = true;
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Flows blocks through fixed-size page frames.
pub struct LayoutEngine {
    fonts: Arc<FontLibrary>,
    styles: Arc<StyleRegistry>,
    page: PageLayout,
}

impl LayoutEngine {
    pub fn new(fonts: Arc<FontLibrary>, styles: Arc<StyleRegistry>, page: PageLayout) -> Self {
        Self {
            fonts,
            styles,
            page,
        }
    }

    pub fn fonts(&self) -> &Arc<FontLibrary> {
        &self.fonts
    }

    pub fn page_layout(&self) -> &PageLayout {
        &self.page
    }

    /// Lays out `blocks` in order. The result always has at least one page.
    pub fn paginate(&self, blocks: &[Block]) -> Result<Vec<Page>, LayoutError> {
        let mut cursor = PageCursor::new(self.page.content_rect());
        for (index, block) in blocks.iter().enumerate() {
            log::trace!("Laying out block {} ({})", index, block.kind());
            match block {
                Block::Paragraph(paragraph) => self.flow_paragraph(&mut cursor, paragraph, index)?,
                Block::Table(table) => self.flow_table(&mut cursor, table, index)?,
                Block::Spacer { height } => {
                    // Negative or NaN heights collapse to nothing.
                    let height = height.max(0.0);
                    if cursor.used && !cursor.fits(height) {
                        cursor.new_page();
                    } else {
                        cursor.advance(height);
                    }
                    cursor.last_space_after = 0.0;
                }
                Block::PageBreak => {
                    if cursor.used {
                        cursor.new_page();
                    }
                }
            }
        }
        let pages = cursor.finish();
        log::debug!("Laid out {} blocks onto {} pages", blocks.len(), pages.len());
        Ok(pages)
    }

    fn flow_paragraph(
        &self,
        cursor: &mut PageCursor,
        paragraph: &ParagraphBlock,
        index: usize,
    ) -> Result<(), LayoutError> {
        let style = compute_style(&self.styles, &paragraph.style)?;
        let layout = layout_paragraph(&self.fonts, &style, &paragraph.inlines, cursor.frame.width)?;

        if layout.leading > cursor.frame.height + EPSILON {
            return Err(LayoutError::ElementTooLarge(layout.leading, cursor.frame.height));
        }

        if cursor.used {
            let gap = (style.space_before - cursor.last_space_after).max(0.0);
            cursor.advance(gap);
        }

        for line in 0..layout.lines.len() {
            if !cursor.fits(layout.leading) {
                cursor.new_page();
            }
            let elements =
                layout.place_lines(line..line + 1, cursor.frame.x, cursor.top(), index);
            cursor.place(elements, layout.leading);
        }

        cursor.advance(style.space_after);
        cursor.last_space_after = style.space_after;
        Ok(())
    }

    fn flow_table(
        &self,
        cursor: &mut PageCursor,
        table: &TableBlock,
        index: usize,
    ) -> Result<(), LayoutError> {
        let layout = layout_table(&self.fonts, &self.styles, table)?;

        let mut start = 0;
        while start < layout.rows.len() {
            let mut end = start;
            let mut height = 0.0;
            while end < layout.rows.len() && cursor.fits(height + layout.rows[end].height) {
                height += layout.rows[end].height;
                end += 1;
            }

            if end == start {
                let row_height = layout.rows[start].height;
                if !cursor.used || row_height > cursor.frame.height + EPSILON {
                    return Err(LayoutError::ElementTooLarge(row_height, cursor.frame.height));
                }
                cursor.new_page();
                continue;
            }

            let elements = layout.place_rows(start..end, cursor.frame.x, cursor.top(), index);
            cursor.place(elements, height);
            start = end;
        }
        cursor.last_space_after = 0.0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FallbackPolicy;
    use crate::test_utils::{body, cell, sample_styles};
    use sheets_style::TableStyle;

    fn engine(page: PageLayout) -> LayoutEngine {
        LayoutEngine::new(
            Arc::new(FontLibrary::new().with_fallback(FallbackPolicy::Builtin)),
            Arc::new(sample_styles()),
            page,
        )
    }

    fn texts(page: &Page) -> Vec<String> {
        page.elements
            .iter()
            .filter_map(|e| e.as_text().map(|t| t.content.clone()))
            .collect()
    }

    #[test]
    fn empty_document_has_one_blank_page() {
        let pages = engine(PageLayout::a4(72.0)).paginate(&[]).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn blocks_keep_their_order() {
        let blocks = vec![
            Block::Paragraph(body("first")),
            Block::Spacer { height: 15.0 },
            Block::Paragraph(body("second")),
        ];
        let pages = engine(PageLayout::a4(72.0)).paginate(&blocks).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(texts(&pages[0]), vec!["first", "second"]);
        assert_eq!(pages[0].block_indices(), vec![0, 2]);
        let first = &pages[0].elements[0];
        let second = &pages[0].elements[1];
        // leading 12 + spacer 15
        assert!((second.y - first.y - 27.0).abs() < EPSILON);
        assert_eq!(first.y, 72.0);
        assert_eq!(first.x, 72.0);
    }

    #[test]
    fn negative_spacer_never_moves_content_up() {
        let blocks = vec![
            Block::Paragraph(body("first")),
            Block::Spacer { height: -100.0 },
            Block::Paragraph(body("second")),
        ];
        let pages = engine(PageLayout::a4(72.0)).paginate(&blocks).unwrap();
        let ys: Vec<f32> = pages[0].elements.iter().map(|e| e.y).collect();
        assert_eq!(ys, vec![72.0, 84.0]);
    }

    #[test]
    fn page_break_starts_a_new_page() {
        let blocks = vec![
            Block::Paragraph(body("one")),
            Block::PageBreak,
            Block::PageBreak,
            Block::Paragraph(body("two")),
        ];
        let pages = engine(PageLayout::a4(72.0)).paginate(&blocks).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[1]), vec!["two"]);
        assert_eq!(pages[1].elements[0].y, 72.0);
    }

    #[test]
    fn trailing_page_break_adds_no_blank_page() {
        let blocks = vec![Block::Paragraph(body("one")), Block::PageBreak];
        let pages = engine(PageLayout::a4(72.0)).paginate(&blocks).unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn long_paragraphs_continue_on_the_next_page() {
        let text = vec!["line"; 80].join("\n");
        let blocks = vec![Block::Paragraph(body(&text))];
        let pages = engine(PageLayout::a4(72.0)).paginate(&blocks).unwrap();
        // Content height 697.89 fits 58 lines of 12pt.
        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0]).len(), 58);
        assert_eq!(texts(&pages[1]).len(), 22);
    }

    #[test]
    fn tables_split_between_rows() {
        let rows = (0..40).map(|i| vec![cell(&format!("row {i}"))]).collect();
        let table = TableBlock::new(rows, vec![200.0], TableStyle::default()).unwrap();
        let pages = engine(PageLayout::a4(72.0))
            .paginate(&[Block::Table(table)])
            .unwrap();
        // Each row is 24pt; 29 rows fit on the first page.
        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0]).len(), 29);
        assert_eq!(texts(&pages[1]).first().map(String::as_str), Some("row 29"));
    }

    #[test]
    fn oversized_row_is_an_error() {
        let text = vec!["x"; 100].join("\n");
        let table = TableBlock::new(vec![vec![cell(&text)]], vec![200.0], TableStyle::default())
            .unwrap();
        let result = engine(PageLayout::a4(72.0)).paginate(&[Block::Table(table)]);
        assert!(matches!(result, Err(LayoutError::ElementTooLarge(..))));
    }

    #[test]
    fn space_before_collapses_with_space_after() {
        let styles = StyleRegistry::sample().build().unwrap();
        let heading = ParagraphBlock::new(
            sheets_idf::TextRole::Header,
            "Heading2",
            sheets_idf::plain_text("Heading"),
        );
        let blocks = vec![
            Block::Paragraph(heading.clone()),
            Block::Paragraph(heading),
        ];
        let engine = LayoutEngine::new(
            Arc::new(FontLibrary::new()),
            Arc::new(styles),
            PageLayout::a4(72.0),
        );
        let pages = engine.paginate(&blocks).unwrap();
        let ys: Vec<f32> = pages[0].elements.iter().map(|e| e.y).collect();
        // First heading ignores space_before at the top of the page.
        // Between them: leading 18 + max(space_after 6, space_before 12).
        assert_eq!(ys[0], 72.0);
        assert!((ys[1] - ys[0] - 30.0).abs() < EPSILON);
    }
}
