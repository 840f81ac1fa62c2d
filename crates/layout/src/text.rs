//! Paragraph layout with line breaking.
//!
//! Text is split into unbreakable words. Breaks happen at collapsible whitespace
//! and between CJK characters. Lines are filled greedily.

use crate::elements::{LayoutElement, PositionedElement, TextElement};
use crate::fonts::{FontError, FontHandle, FontLibrary};
use crate::style::ComputedStyle;
use sheets_idf::InlineNode;
use sheets_style::TextAlign;
use sheets_types::Color;
use std::ops::Range;

const EPSILON: f32 = 0.01;

/// Everything needed to draw a run of text except the text itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStyle {
    pub font: FontHandle,
    pub font_size: f32,
    pub color: Color,
    pub synthetic_bold: bool,
    pub synthetic_italic: bool,
}

impl RunStyle {
    fn resolve(fonts: &FontLibrary, style: &ComputedStyle) -> Result<Self, FontError> {
        let font = fonts.resolve(&style.font_name, style.font_weight, style.font_style)?;
        let embedded = font.is_embedded();
        Ok(Self {
            font,
            font_size: style.font_size,
            color: style.color,
            synthetic_bold: embedded && style.font_weight.is_bold(),
            synthetic_italic: embedded && style.font_style.is_italic(),
        })
    }

    fn measure(&self, text: &str) -> f32 {
        self.font.text_width(text, self.font_size)
    }
}

#[derive(Debug, Clone)]
struct Run {
    text: String,
    style: RunStyle,
    width: f32,
}

impl Run {
    fn new(text: String, style: RunStyle) -> Self {
        let width = style.measure(&text);
        Self { text, style, width }
    }
}

enum Fragment {
    Text { text: String, style: RunStyle },
    Break,
}

enum Piece {
    Word(Vec<Run>),
    Space(Run),
    Newline,
}

#[derive(Debug, Clone)]
pub struct PlacedRun {
    pub text: String,
    pub style: RunStyle,
    /// Offset from the start of the line.
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Line {
    pub runs: Vec<PlacedRun>,
    pub width: f32,
}

impl Line {
    fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    fn push(&mut self, run: Run) {
        if let Some(last) = self.runs.last_mut() {
            if last.style == run.style {
                last.text.push_str(&run.text);
                last.width += run.width;
                self.width += run.width;
                return;
            }
        }
        self.runs.push(PlacedRun {
            text: run.text,
            style: run.style,
            x: self.width,
            width: run.width,
        });
        self.width += run.width;
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A paragraph broken into lines, ready to be placed at any position.
#[derive(Debug, Clone)]
pub struct ParagraphLayout {
    pub lines: Vec<Line>,
    pub leading: f32,
    pub align: TextAlign,
    pub max_width: f32,
    baseline_offset: f32,
}

impl ParagraphLayout {
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.leading
    }

    /// Positions `lines` with the first one's top edge at `top`.
    pub fn place_lines(
        &self,
        lines: Range<usize>,
        x: f32,
        top: f32,
        block_index: usize,
    ) -> Vec<PositionedElement> {
        let mut elements = Vec::new();
        for (row, line) in self.lines[lines].iter().enumerate() {
            let line_top = top + row as f32 * self.leading;
            let start_x = x + self.align.offset(self.max_width, line.width);
            for run in &line.runs {
                elements.push(PositionedElement {
                    x: start_x + run.x,
                    y: line_top,
                    width: run.width,
                    height: self.leading,
                    block_index,
                    element: LayoutElement::Text(TextElement {
                        content: run.text.clone(),
                        font: run.style.font.clone(),
                        font_size: run.style.font_size,
                        color: run.style.color,
                        baseline: line_top + self.baseline_offset,
                        synthetic_bold: run.style.synthetic_bold,
                        synthetic_italic: run.style.synthetic_italic,
                    }),
                });
            }
        }
        elements
    }
}

/// Breaks `inlines` into lines no wider than `max_width`.
pub fn layout_paragraph(
    fonts: &FontLibrary,
    style: &ComputedStyle,
    inlines: &[InlineNode],
    max_width: f32,
) -> Result<ParagraphLayout, FontError> {
    let mut fragments = Vec::new();
    collect_fragments(fonts, inlines, style, &mut fragments)?;
    let lines = fill_lines(segment(fragments), max_width);

    let base_font = fonts.resolve(&style.font_name, style.font_weight, style.font_style)?;
    let ascent = base_font.ascent(style.font_size);
    let descent = base_font.descent(style.font_size);

    Ok(ParagraphLayout {
        lines,
        leading: style.leading,
        align: style.text_align,
        max_width,
        baseline_offset: (style.leading - (ascent + descent)) / 2.0 + ascent,
    })
}

fn collect_fragments(
    fonts: &FontLibrary,
    inlines: &[InlineNode],
    style: &ComputedStyle,
    out: &mut Vec<Fragment>,
) -> Result<(), FontError> {
    for inline in inlines {
        match inline {
            InlineNode::Text(text) => out.push(Fragment::Text {
                text: text.clone(),
                style: RunStyle::resolve(fonts, style)?,
            }),
            InlineNode::Span {
                style: span,
                children,
            } => collect_fragments(fonts, children, &style.with_span(span), out)?,
            InlineNode::LineBreak => out.push(Fragment::Break),
        }
    }
    Ok(())
}

fn is_collapsible_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_cjk(c: char) -> bool {
    matches!(c as u32,
        0x3000..=0x30FF | 0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xF900..=0xFAFF | 0xFF00..=0xFFEF)
}

/// Characters that may not begin a line.
fn no_break_before(c: char) -> bool {
    "、。，．・：；？！ー」』）】〕〉》〜ぁぃぅぇぉっゃゅょゎァィゥェォッャュョヮヵヶ々),.:;!?]}"
        .contains(c)
}

/// Characters that may not end a line.
fn no_break_after(c: char) -> bool {
    "「『（【〔〈《([{".contains(c)
}

fn can_break_between(prev: char, next: char) -> bool {
    (is_cjk(prev) || is_cjk(next)) && !no_break_before(next) && !no_break_after(prev)
}

fn flush_word(word: &mut Vec<Run>, pieces: &mut Vec<Piece>) {
    if !word.is_empty() {
        pieces.push(Piece::Word(std::mem::take(word)));
    }
}

fn flush_run(buffer: &mut String, style: &RunStyle, word: &mut Vec<Run>) {
    if !buffer.is_empty() {
        word.push(Run::new(std::mem::take(buffer), style.clone()));
    }
}

fn segment(fragments: Vec<Fragment>) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut word: Vec<Run> = Vec::new();
    let mut prev: Option<char> = None;

    for fragment in fragments {
        let (text, style) = match fragment {
            Fragment::Break => {
                flush_word(&mut word, &mut pieces);
                pieces.push(Piece::Newline);
                prev = None;
                continue;
            }
            Fragment::Text { text, style } => (text, style),
        };

        let mut buffer = String::new();
        for c in text.chars() {
            if is_collapsible_space(c) {
                flush_run(&mut buffer, &style, &mut word);
                flush_word(&mut word, &mut pieces);
                if !matches!(pieces.last(), Some(Piece::Space(_))) {
                    pieces.push(Piece::Space(Run::new(" ".to_string(), style.clone())));
                }
                prev = None;
                continue;
            }
            if prev.is_some_and(|p| can_break_between(p, c)) {
                flush_run(&mut buffer, &style, &mut word);
                flush_word(&mut word, &mut pieces);
            }
            buffer.push(c);
            prev = Some(c);
        }
        flush_run(&mut buffer, &style, &mut word);
    }
    flush_word(&mut word, &mut pieces);
    pieces
}

fn fill_lines(pieces: Vec<Piece>, max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = Line::default();
    let mut pending_space: Option<Run> = None;

    for piece in pieces {
        match piece {
            Piece::Newline => {
                lines.push(std::mem::take(&mut current));
                pending_space = None;
            }
            Piece::Space(run) => {
                if !current.is_empty() && pending_space.is_none() {
                    pending_space = Some(run);
                }
            }
            Piece::Word(runs) => {
                let width: f32 = runs.iter().map(|r| r.width).sum();
                let space = pending_space.as_ref().map_or(0.0, |s| s.width);
                if !current.is_empty() && current.width + space + width > max_width + EPSILON {
                    lines.push(std::mem::take(&mut current));
                    pending_space = None;
                }
                if let Some(space) = pending_space.take() {
                    current.push(space);
                }

                if current.is_empty() && width > max_width + EPSILON {
                    split_overlong_word(runs, max_width, &mut current, &mut lines);
                } else {
                    for run in runs {
                        current.push(run);
                    }
                }
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Places a word wider than the line one character at a time.
fn split_overlong_word(runs: Vec<Run>, max_width: f32, current: &mut Line, lines: &mut Vec<Line>) {
    for run in runs {
        for c in run.text.chars() {
            let piece = Run::new(c.to_string(), run.style.clone());
            if !current.is_empty() && current.width + piece.width > max_width + EPSILON {
                lines.push(std::mem::take(current));
            }
            current.push(piece);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FallbackPolicy;
    use sheets_idf::parse_markup;
    use sheets_style::FontWeight;

    fn helvetica() -> ComputedStyle {
        ComputedStyle::default()
    }

    fn lines_of(markup: &str, width: f32) -> Vec<String> {
        let fonts = FontLibrary::new().with_fallback(FallbackPolicy::Builtin);
        let inlines = parse_markup(markup).unwrap();
        layout_paragraph(&fonts, &helvetica(), &inlines, width)
            .unwrap()
            .lines
            .iter()
            .map(Line::text)
            .collect()
    }

    #[test]
    fn test_simple_line_break() {
        // "aaaa" is 4 * 5.56 = 22.24pt at 10pt.
        let lines = lines_of("aaaa aaaa aaaa", 50.0);
        assert_eq!(lines, vec!["aaaa aaaa", "aaaa"]);
    }

    #[test]
    fn test_explicit_line_break() {
        let lines = lines_of("one<br/>two<br/><br/>three<br/>", 500.0);
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn whitespace_collapses_and_leading_space_is_dropped() {
        let lines = lines_of("\n    <b>Context:</b>   a  b\n", 500.0);
        assert_eq!(lines, vec!["Context: a b"]);
    }

    #[test]
    fn no_break_space_is_kept() {
        let lines = lines_of("&nbsp;&nbsp;a)", 500.0);
        assert_eq!(lines, vec!["\u{a0}\u{a0}a)"]);
    }

    #[test]
    fn cjk_breaks_between_characters_but_not_before_closing_marks() {
        // Every non-WinAnsi char measures as '?', 5.56pt at 10pt.
        let lines = lines_of("あいうえお。", 12.0);
        assert_eq!(lines, vec!["あい", "うえ", "お。"]);
    }

    #[test]
    fn overlong_words_split_by_character() {
        let lines = lines_of("______________", 30.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "______________");
    }

    #[test]
    fn runs_keep_their_styles() {
        let fonts = FontLibrary::new();
        let inlines = parse_markup("<b>A:</b> hello").unwrap();
        let layout = layout_paragraph(&fonts, &helvetica(), &inlines, 500.0).unwrap();
        let runs = &layout.lines[0].runs;
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "A:");
        assert_eq!(runs[0].style.font.base_name(), "Helvetica-Bold");
        assert_eq!(runs[1].text, " hello");
        assert!((runs[1].x - runs[0].width).abs() < EPSILON);
        let bold = ComputedStyle {
            font_weight: FontWeight::Bold,
            ..helvetica()
        };
        assert!(RunStyle::resolve(&fonts, &bold).unwrap().font.base_name().ends_with("Bold"));
    }

    #[test]
    fn test_text_alignment() {
        let fonts = FontLibrary::new();
        let style = ComputedStyle {
            text_align: TextAlign::Center,
            ..helvetica()
        };
        let inlines = parse_markup("aaaa").unwrap();
        let layout = layout_paragraph(&fonts, &style, &inlines, 100.0).unwrap();
        let elements = layout.place_lines(0..1, 10.0, 0.0, 0);
        let expected_x = 10.0 + (100.0 - 22.24) / 2.0;
        assert!((elements[0].x - expected_x).abs() < EPSILON);
        assert_eq!(elements[0].height, style.leading);
    }

    #[test]
    fn unregistered_font_fails_in_strict_mode() {
        let fonts = FontLibrary::new();
        let style = ComputedStyle {
            font_name: "JapaneseFont".into(),
            ..helvetica()
        };
        let inlines = parse_markup("x").unwrap();
        assert!(matches!(
            layout_paragraph(&fonts, &style, &inlines, 100.0),
            Err(FontError::NotRegistered(_))
        ));
    }
}
