//! Chapter 19 honorifics: the fill-in worksheet and its answer key.

use super::{BLANK, NAME_DATE, Worksheet, jp, registry};
use crate::content::{
    CellValue, ContentItem, HEADER_STYLE, TEXT_STYLE, TITLE_STYLE, TableContent,
};
use crate::error::PipelineError;
use sheets_style::{
    PageLayout, ParagraphStyle, StyleError, StyleRegistry, TableStyle, TextAlign, VerticalAlign,
};
use sheets_types::Color;
use std::sync::Arc;

const ANSWER_STYLE: &str = "Answer";

const VERB_ROWS: [[&str; 2]; 6] = [
    ["いく / くる / いる", "to go/come/be"],
    ["たべる / のむ", "to eat/drink"],
    ["する", "to do"],
    ["いう", "to say"],
    ["みる", "to see"],
    ["寝る (ねる)", "to sleep"],
];

const NOUN_WORDS: [&str; 4] = ["名前 (Name)", "忙しい (Busy)", "家族 (Family)", "電話 (Phone)"];

fn styles(title_color: Option<Color>) -> Result<Arc<StyleRegistry>, StyleError> {
    let mut title = jp(TITLE_STYLE, "Heading1")
        .font_size(18.0)
        .space_after(12.0)
        .alignment(TextAlign::Center);
    if let Some(color) = title_color {
        title = title.text_color(color);
    }
    registry([
        title,
        jp(HEADER_STYLE, "Heading2")
            .font_size(14.0)
            .space_before(12.0)
            .space_after(6.0),
        jp(TEXT_STYLE, "Normal")
            .font_size(11.0)
            .leading(16.0)
            .space_after(10.0),
        ParagraphStyle::new(ANSWER_STYLE)
            .parent(TEXT_STYLE)
            .text_color(Color::rgb(255, 0, 0)),
    ])
}

fn indent(width: usize) -> String {
    "&nbsp;".repeat(width)
}

pub(super) fn worksheet() -> Result<Worksheet, PipelineError> {
    let mut verbs: Vec<Vec<CellValue>> = vec![vec![
        "Standard (辞書形)".into(),
        "Meaning".into(),
        "Honorific (尊敬語)".into(),
    ]];
    verbs.extend(
        VERB_ROWS
            .iter()
            .map(|[verb, meaning]| vec![(*verb).into(), (*meaning).into(), BLANK.into()]),
    );

    let mut nouns: Vec<Vec<CellValue>> = vec![vec!["Word".into(), "Polite Form".into()]];
    nouns.extend(NOUN_WORDS.iter().map(|word| vec![(*word).into(), BLANK.into()]));

    let pad = indent(17);
    let dialogue = format!(
        "<b>Context:</b> A student sees their teacher at the station.<br/><br/>\
         <b>Student:</b> 先生、こんにちは。どちらに (1) ________________________ か。<br/>\
         {pad}(iku: honorific)<br/><br/>\
         <b>Teacher:</b> ああ、田中さん。ちょっとデパートに (2) ________________________。<br/>\
         {pad}(iku: polite)<br/><br/>\
         <b>Student:</b> そうですか。先生、もうお昼ご飯を (3) ________________________ か。<br/>\
         {pad}(taberu: honorific)<br/><br/>\
         <b>Teacher:</b> いいえ、まだ (4) ________________________。忙しかったですから。<br/>\
         {pad}(taberu: polite negative)<br/>"
    );

    Ok(Worksheet {
        filename: "Genki_Honorifics_Worksheet.pdf",
        page: PageLayout::a4(72.0),
        styles: styles(None)?,
        table_style: TableStyle::default()
            .vertical_align(VerticalAlign::Bottom)
            .trailing_space(0.0),
        content: vec![
            ContentItem::title("Genki II - Chapter 19: Honorifics (Keigo)"),
            ContentItem::text(NAME_DATE),
            ContentItem::spacer(12.0),
            ContentItem::header("I. Special Honorific Verbs (尊敬語)"),
            ContentItem::text("Fill in the correct Special Honorific dictionary form."),
            ContentItem::table(TableContent::new(verbs, vec![150.0, 100.0, 180.0])?),
            ContentItem::spacer(20.0),
            ContentItem::header("II. Dialogue: Teacher and Student"),
            ContentItem::text("Fill in the blanks using the appropriate Honorific form."),
            ContentItem::text(dialogue),
            ContentItem::spacer(10.0),
            ContentItem::header("III. Choose the Correct Sentence"),
            ContentItem::text(
                "Circle the correct Honorific sentence for the <b>Teacher's</b> actions.",
            ),
            ContentItem::text(
                "1. The teacher reads a book.<br/>\
                 &nbsp;&nbsp;a) 先生は本を読みます。<br/>\
                 &nbsp;&nbsp;b) 先生は本をお読みになります。<br/>\
                 &nbsp;&nbsp;c) 先生は本をお読みします。<br/>",
            ),
            ContentItem::header("IV. Honorific Nouns & Adjectives"),
            ContentItem::text("Add 'お (o)' or 'ご (go)' to the words below."),
            ContentItem::table(TableContent::new(nouns, vec![150.0, 180.0])?),
        ],
        requires_font: false,
    })
}

/// A red answer cell.
fn answer(text: &str) -> CellValue {
    CellValue::formatted_with(format!("<font color='red'>{text}</font>"), TEXT_STYLE)
}

pub(super) fn answer_key() -> Result<Worksheet, PipelineError> {
    const HONORIFICS: [&str; 6] = [
        "いらっしゃる",
        "召し上がる (めしあがる)",
        "なさる",
        "おっしゃる",
        "ご覧になる (ごらんになる)",
        "お休みになる (おやすみになる)",
    ];
    const POLITE_NOUNS: [&str; 4] = ["お名前", "お忙しい", "ご家族", "お電話"];

    let mut verbs: Vec<Vec<CellValue>> = vec![vec![
        "Standard (辞書形)".into(),
        "Meaning".into(),
        "Honorific (Answer)".into(),
    ]];
    verbs.extend(
        VERB_ROWS
            .iter()
            .zip(HONORIFICS)
            .map(|([verb, meaning], honorific)| {
                vec![(*verb).into(), (*meaning).into(), answer(honorific)]
            }),
    );

    let mut nouns: Vec<Vec<CellValue>> = vec![vec!["Word".into(), "Polite Form".into()]];
    nouns.extend(
        NOUN_WORDS
            .iter()
            .zip(POLITE_NOUNS)
            .map(|(word, polite)| vec![(*word).into(), answer(polite)]),
    );

    let note = |text: &str| format!("&nbsp;&nbsp;&nbsp;<font size=9 color=grey>{text}</font>");
    let dialogue = format!(
        "1. <b>いらっしゃいます</b> (or いらっしゃいました)<br/>{}<br/><br/>\
         2. <b>参ります (まいります)</b> or <b>行きます</b><br/>{}<br/><br/>\
         3. <b>召し上がりました (めしあがりました)</b><br/>{}<br/><br/>\
         4. <b>食べていません</b> or <b>まだなんです</b><br/>{}",
        note("Subject is Teacher (Honorific)"),
        note("Subject is Teacher talking about himself (Humble/Polite)"),
        note("Subject is Teacher (Honorific)"),
        note("Subject is Teacher talking about himself (Polite/Humble)"),
    );

    Ok(Worksheet {
        filename: "Genki_Honorifics_AnswerKey.pdf",
        page: PageLayout::a4(72.0),
        styles: styles(Color::named("darkblue"))?,
        table_style: TableStyle::default().trailing_space(0.0),
        content: vec![
            ContentItem::title("ANSWER KEY: Genki II - Chapter 19"),
            ContentItem::spacer(12.0),
            ContentItem::header("I. Special Honorific Verbs (尊敬語)"),
            ContentItem::table(TableContent::new(verbs, vec![150.0, 100.0, 180.0])?),
            ContentItem::spacer(20.0),
            ContentItem::header("II. Dialogue: Teacher and Student"),
            ContentItem::styled_text(dialogue, ANSWER_STYLE),
            ContentItem::spacer(10.0),
            ContentItem::header("III. Choose the Correct Sentence"),
            ContentItem::styled_text("1. <b>(b) 先生は本をお読みになります。</b>", ANSWER_STYLE),
            ContentItem::spacer(10.0),
            ContentItem::header("IV. Honorific Nouns & Adjectives"),
            ContentItem::table(TableContent::new(nouns, vec![150.0, 180.0])?),
        ],
        requires_font: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(sheet: &Worksheet) -> Vec<&TableContent> {
        sheet
            .content
            .iter()
            .filter_map(|item| match item {
                ContentItem::Table(table) => Some(table),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn worksheet_tables_have_blank_answer_columns() {
        let sheet = worksheet().unwrap();
        let tables = tables(&sheet);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].row_count(), 7);
        assert_eq!(tables[0].column_widths(), &[150.0, 100.0, 180.0]);
        assert!(tables[0].rows()[1..].iter().all(|row| row[2] == CellValue::from(BLANK)));
        assert_eq!(tables[1].row_count(), 5);
    }

    #[test]
    fn answer_cells_are_red_markup() {
        let sheet = answer_key().unwrap();
        let tables = tables(&sheet);
        assert_eq!(
            tables[0].rows()[2][2],
            CellValue::formatted_with("<font color='red'>召し上がる (めしあがる)</font>", TEXT_STYLE)
        );
        assert_eq!(tables[1].rows()[3][1], answer("ご家族"));
    }

    #[test]
    fn dialogue_parentheticals_are_indented() {
        let sheet = worksheet().unwrap();
        let dialogue = sheet
            .content
            .iter()
            .find_map(|item| match item {
                ContentItem::Text { text, .. } if text.starts_with("<b>Context:</b>") => Some(text),
                _ => None,
            })
            .unwrap();
        assert_eq!(dialogue.matches(&format!("{}(", indent(17))).count(), 4);
    }
}
