//! Lesson 19 practice: respectful advice, gratitude, reflections and expectations.

use super::{Worksheet, jp, registry};
use crate::content::{
    ContentItem, DEFAULT_SPACER_HEIGHT, HEADER_STYLE, TEXT_STYLE, TITLE_STYLE, TableContent,
};
use crate::error::PipelineError;
use sheets_style::{PageLayout, StyleError, StyleRegistry, TableStyle, TextAlign};
use sheets_types::Color;
use std::sync::Arc;

const LONG_BLANK: &str = "___________________________";
const ANSWER_LINE: &str =
    "&nbsp;&nbsp;&nbsp;_________________________________________________________";

fn styles() -> Result<Arc<StyleRegistry>, StyleError> {
    registry([
        jp(TITLE_STYLE, "Heading1")
            .font_size(18.0)
            .alignment(TextAlign::Center)
            .space_after(12.0),
        jp(HEADER_STYLE, "Heading2")
            .font_size(14.0)
            .space_before(12.0)
            .space_after(6.0)
            .text_color(Color::rgb(0, 0, 139)),
        jp(TEXT_STYLE, "Normal")
            .font_size(11.0)
            .leading(16.0)
            .space_after(10.0),
    ])
}

/// A prompt column next to an empty answer column.
fn exercise_table(
    headings: [&str; 2],
    prompts: &[&str],
    widths: [f32; 2],
) -> Result<TableContent, PipelineError> {
    let rows: Vec<[&str; 2]> = std::iter::once(headings)
        .chain(prompts.iter().map(|prompt| [*prompt, LONG_BLANK]))
        .collect();
    let rows: Vec<&[&str]> = rows.iter().map(|row| row.as_slice()).collect();
    Ok(TableContent::plain(&rows, &widths)?)
}

pub(super) fn interact() -> Result<Worksheet, PipelineError> {
    let advice = exercise_table(
        ["Standard Polite (てください)", "Respectful Advice (お〜ください)"],
        &[
            "入ってください (はいる)",
            "待ってください (まつ)",
            "切符を取ってください (とる)",
            "説明を読んでください (よむ)",
            "家に帰ってください (かえる)",
        ],
        [150.0, 200.0],
    )?;

    let mut content = vec![
        ContentItem::title("Genki II L19: Respectful Advice & Gratitude"),
        ContentItem::header("I. Respectful Advice (お + Stem + ください)"),
        ContentItem::text(
            "Imagine you are a store clerk or station attendant. \
             Change the following polite requests into Respectful Advice.",
        ),
        ContentItem::table(advice),
        ContentItem::header("II. Expressing Gratitude (～てくれてありがとう)"),
        ContentItem::text(
            "You are talking to a friend. Express gratitude for the specific actions below.",
        ),
        ContentItem::text(
            "<b>Example:</b> Friend helped you. <br/>\
             &nbsp;&rightarrow; 手伝ってくれてありがとう。 (Tetsudatte kurete arigatou.)",
        ),
        ContentItem::spacer(DEFAULT_SPACER_HEIGHT),
    ];
    for prompt in [
        "1. Your friend wrote a recommendation letter (すいせんじょう) for you.",
        "2. Your friend came to pick you up (むかえにくる) at the station.",
        "3. Your friend waited (まつ) for you for one hour.",
        "4. Your friend lent (かす) you money.",
    ] {
        content.push(ContentItem::text(prompt));
        content.push(ContentItem::text(ANSWER_LINE));
    }
    content.extend([
        ContentItem::header("III. Dialogue Translation"),
        ContentItem::text("Translate the bracketed English into Japanese."),
        ContentItem::text("<b>A:</b> This bag is heavy..."),
        ContentItem::text("<b>B:</b> I will carry it. (Use <i>Humble</i>: motsu -> o-mochi shimasu)"),
        ContentItem::text("<b>A:</b> Really? [Thank you for carrying it.]"),
        ContentItem::page_break(),
        ContentItem::header("ANSWER KEY"),
        ContentItem::text(
            "<b>I. Respectful Advice</b><br/>\
             1. お入りください (O-hairi kudasai)<br/>\
             2. お待ちください (O-machi kudasai)<br/>\
             3. お取りください (O-tori kudasai)<br/>\
             4. お読みください (O-yomi kudasai)<br/>\
             5. お帰りください (O-kaeri kudasai)",
        ),
        ContentItem::text(
            "<b>II. Gratitude</b><br/>\
             1. すいせんじょうを書いてくれてありがとう。<br/>\
             2. (駅まで) むかえに来てくれてありがとう。<br/>\
             3. 待ってくれてありがとう。<br/>\
             4. (お金を) 貸してくれてありがとう。",
        ),
        ContentItem::text("<b>III. Translation</b><br/>持ってくれてありがとう (Motte kurete arigatou)"),
    ]);

    Ok(Worksheet {
        filename: "Genki_L19_Worksheet_Interact.pdf",
        page: PageLayout::a4(72.0),
        styles: styles()?,
        table_style: TableStyle::default(),
        content,
        requires_font: false,
    })
}

pub(super) fn reflect() -> Result<Worksheet, PipelineError> {
    let glad = exercise_table(
        ["Situation", "Result (\"I am glad that...\")"],
        &[
            "I studied Japanese. (勉強する)",
            "I did not catch a cold. (風邪をひく)",
            "I went to the festival. (お祭りに行く)",
            "I did not give up. (あきらめる)",
        ],
        [200.0, 200.0],
    )?;

    let content = vec![
        ContentItem::title("Genki II L19: Reflections & Expectations"),
        ContentItem::header("I. I am glad that... (～てよかったです)"),
        ContentItem::text(
            "Combine the situation with \"yokatta desu\". \
             Pay attention to Positive (〜て) vs Negative (〜なくて).",
        ),
        ContentItem::table(glad),
        ContentItem::header("II. Expectations (～はずです)"),
        ContentItem::text(
            "Finish the sentences based on logical expectation. <br/>\
             (Remember: Nouns take <b>no</b> / Na-adj take <b>na</b> before hazu)",
        ),
        ContentItem::text("1. Tanaka-san lived in America for 10 years."),
        ContentItem::text("&nbsp;&nbsp;&nbsp;He [should be able to speak English]."),
        ContentItem::text("&nbsp;&nbsp;&nbsp;田中さんは ___________________________________ です。"),
        ContentItem::text("2. Today is a national holiday (祝日)."),
        ContentItem::text("&nbsp;&nbsp;&nbsp;The bank [should be closed (shimaru)]."),
        ContentItem::text("&nbsp;&nbsp;&nbsp;銀行は _______________________________________ です。"),
        ContentItem::text("3. Mary studied very hard."),
        ContentItem::text("&nbsp;&nbsp;&nbsp;The exam [should not be difficult]."),
        ContentItem::text("&nbsp;&nbsp;&nbsp;試験は _______________________________________ です。"),
        ContentItem::page_break(),
        ContentItem::header("ANSWER KEY"),
        ContentItem::text(
            "<b>I. Glad that...</b><br/>\
             1. 勉強してよかったです。<br/>\
             2. 風邪をひかなくてよかったです。<br/>\
             3. お祭りに行ってよかったです。<br/>\
             4. あきらめなくてよかったです。",
        ),
        ContentItem::text(
            "<b>II. Expectations</b><br/>\
             1. 英語が話せるはずです (Eigo ga hanaseru hazu desu)<br/>\
             2. 閉まっているはずです (Shimatteiru hazu desu)<br/>\
             3. 難しくないはずです (Muzukashikunai hazu desu)",
        ),
    ];

    Ok(Worksheet {
        filename: "Genki_L19_Worksheet_Reflect.pdf",
        page: PageLayout::a4(72.0),
        styles: styles()?,
        table_style: TableStyle::default(),
        content,
        requires_font: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exercise_tables_pair_prompts_with_blanks() {
        let table = exercise_table(["A", "B"], &["x", "y"], [100.0, 120.0]).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_widths(), &[100.0, 120.0]);
        assert_eq!(table.rows()[2][1], LONG_BLANK.into());
    }

    #[test]
    fn answer_keys_follow_a_page_break() {
        for sheet in [interact().unwrap(), reflect().unwrap()] {
            let position = sheet
                .content
                .iter()
                .position(|item| *item == ContentItem::PageBreak)
                .unwrap();
            assert_eq!(sheet.content[position + 1], ContentItem::header("ANSWER KEY"));
        }
    }
}
