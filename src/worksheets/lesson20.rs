//! Lesson 20 extra-modest expressions, and the combined Lesson 19 & 20 review.

use super::{BLANK, NAME_DATE, Worksheet, jp, registry};
use crate::content::{ContentItem, HEADER_STYLE, TEXT_STYLE, TITLE_STYLE, TableContent};
use crate::error::PipelineError;
use sheets_style::{PageLayout, ParagraphStyle, TableStyle, TextAlign};
use sheets_types::Color;

const TABLE_TEXT_STYLE: &str = "TableText";
const ANSWER_TABLE_STYLE: &str = "AnsTable";
const DARK_BLUE: Color = Color::rgb(0, 0, 139);

fn table_text(leading: f32) -> ParagraphStyle {
    ParagraphStyle::new(TABLE_TEXT_STYLE)
        .parent(TEXT_STYLE)
        .alignment(TextAlign::Center)
        .leading(leading)
}

pub(super) fn extra_modest() -> Result<Worksheet, PipelineError> {
    let styles = registry([
        jp(TITLE_STYLE, "Heading1")
            .font_size(18.0)
            .alignment(TextAlign::Center)
            .space_after(12.0),
        jp(HEADER_STYLE, "Heading2")
            .font_size(14.0)
            .space_before(12.0)
            .space_after(6.0)
            .text_color(DARK_BLUE),
        jp(TEXT_STYLE, "Normal")
            .font_size(11.0)
            .leading(18.0)
            .space_after(10.0),
        table_text(14.0),
    ])?;

    let verbs = TableContent::formatted(
        &[
            &["Standard Verb\n(辞書形)", "Extra-modest\n(〜ます)", "Meaning"],
            &["いる", BLANK, "(to be)"],
            &["行く / 来る\n", BLANK, "(to go/come)"],
            &["言う\n", BLANK, "(to say)"],
            &["する", BLANK, "(to do)"],
            &["食べる / 飲む\n", BLANK, "(to eat/drink)"],
            &["ある", BLANK, "(to exist)"],
            &["〜ている", BLANK, "(is doing...)"],
            &["〜です", BLANK, "(is...)"],
        ],
        &[150.0, 180.0, 100.0],
    )?
    .with_cell_style(TABLE_TEXT_STYLE);

    let mut content = vec![
        ContentItem::title("Genki II - Lesson 20: Extra-modest Expressions"),
        ContentItem::text(NAME_DATE),
        ContentItem::spacer(12.0),
        ContentItem::header("I. Verbs to Extra-modest Expressions (謙譲語・丁重語)"),
        ContentItem::text("Convert the verbs into their Extra-modest 'masu' forms."),
        ContentItem::table(verbs),
        ContentItem::spacer(20.0),
        ContentItem::header("II. Q&A: Honorific vs. Extra-modest"),
        ContentItem::text(
            "Read the Question (Honorific). Fill in the Answer using the <b>Extra-modest</b> form.",
        ),
        ContentItem::spacer(6.0),
    ];

    let questions = [
        ("<b>Q1:</b> お名前は何とおっしゃいますか。", "<b>A:</b> 田中と _____________________________ 。(say)"),
        ("<b>Q2:</b> どちらにいらっしゃいますか。", "<b>A:</b> 駅 (えき) に _____________________________ 。(go)"),
        ("<b>Q3:</b> トイレはどちらにありますか。", "<b>A:</b> あちらに _____________________________ 。(exist)"),
        ("<b>Q4:</b> 学生さんでいらっしゃいますか。", "<b>A:</b> はい、学生_____________________________ 。(is)"),
    ];
    for (i, (question, answer)) in questions.into_iter().enumerate() {
        let gap = if i + 1 == questions.len() { 20.0 } else { 8.0 };
        content.extend([
            ContentItem::text(question),
            ContentItem::text(answer),
            ContentItem::spacer(gap),
        ]);
    }

    let pad = "&nbsp;".repeat(16);
    content.extend([
        ContentItem::header("III. Business Dialogue: Honorific or Modest?"),
        ContentItem::text(
            "Circle the correct verb. Remember: Raise the customer up (Honorific), \
             lower yourself down (Modest).",
        ),
        ContentItem::spacer(6.0),
        ContentItem::text(format!(
            "<b>Situation:</b> Mr. Miller (Customer) visits a Japanese company.<br/><br/>\
             <b>Receptionist:</b> いらっしゃいませ。<br/><br/>\
             <b>Miller:</b> あの、私はミラーと ( a. おっしゃいます / b. 申 (もう) します )。<br/>\
             {pad}2時に山下先生に会うやくそくが<br/>\
             {pad}( a. ございます / b. あります )。<br/><br/>\
             <b>Receptionist:</b> ああ、ミラー様( a. でございます / b. でいらっしゃいます ) ね。<br/>\
             {pad}お待ちして ( a. いました / b.おりました )。<br/><br/>\
             <b>Miller:</b> よろしく ( a. お願 (ねが) いいたします / b. お願 (ねが) いなさいます )。<br/><br/>\
             <b>Receptionist:</b> どうぞ、こちらへ。<br/>\
             {pad}ごあんない ( a. いたします / b. なさいます )。"
        )),
        ContentItem::page_break(),
        ContentItem::title("ANSWER KEY: Lesson 20 Extra-modest"),
        ContentItem::header("<b>I. Table</b>"),
        ContentItem::text(
            "いる &rarr; <b>おります</b><br/>\
             行く / 来る &rarr; <b>参 (まい) ります</b><br/>\
             言う &rarr; <b>申 (もう) します</b><br/>\
             する &rarr; <b>いたします</b><br/>\
             食べる / 飲む &rarr; <b>いただきます</b><br/>\
             ある &rarr; <b>ございます</b><br/>\
             〜ている &rarr; <b>〜ております</b><br/>\
             〜です &rarr; <b>〜でございます</b>",
        ),
        ContentItem::header("<b>II. Q&A</b>"),
        ContentItem::text(
            "1. 田中と<b>申 (もう) します</b>。<br/>\
             2. 駅へ<b>参 (まい) ります</b>。<br/>\
             3. あちらに<b>ございます</b>。<br/>\
             4. はい、学生<b>でございます</b>。",
        ),
        ContentItem::header("<b>III. Dialogue</b>"),
        ContentItem::text(
            "1. <b>(b) 申します</b><br/>\
             2. <b>(a) ございます</b><br/>\
             3. <b>(b) でいらっしゃいます</b><br/>\
             4. <b>(b) おりました</b><br/>\
             5. <b>(a) お願いいたします</b><br/>\
             6. <b>(a) いたします</b>",
        ),
    ]);

    Ok(Worksheet {
        filename: "Genki_L20_ExtraModest_Furigana.pdf",
        page: PageLayout::a4(72.0),
        styles,
        table_style: TableStyle::default().padding(8.0).trailing_space(0.0),
        content,
        requires_font: false,
    })
}

pub(super) fn review() -> Result<Worksheet, PipelineError> {
    let styles = registry([
        jp(TITLE_STYLE, "Heading1")
            .font_size(16.0)
            .alignment(TextAlign::Center)
            .space_after(6.0),
        jp(HEADER_STYLE, "Heading2")
            .font_size(12.0)
            .space_before(10.0)
            .space_after(4.0)
            .text_color(DARK_BLUE),
        jp(TEXT_STYLE, "Normal")
            .font_size(10.5)
            .leading(14.0)
            .space_after(2.0),
        table_text(12.0),
        ParagraphStyle::new(ANSWER_TABLE_STYLE)
            .parent(TEXT_STYLE)
            .alignment(TextAlign::Center),
    ])?;

    let verbs = TableContent::formatted(
        &[
            &[
                "Standard",
                "Honorific\n<font size=8 color=grey>Subject: Teacher/Guest</font>",
                "Extra-Modest\n<font size=8 color=grey>Subject: Me/My Company</font>",
            ],
            &["行く / 来る\n<font size=8>(いく / くる)</font>", BLANK, BLANK],
            &["言う\n<font size=8>(いう)</font>", BLANK, BLANK],
            &["する", BLANK, BLANK],
            &["食べる / 飲む\n<font size=8>(たべる / のむ)</font>", BLANK, BLANK],
            &["いる", BLANK, BLANK],
        ],
        &[120.0, 160.0, 160.0],
    )?
    .with_cell_style(TABLE_TEXT_STYLE);

    let answers = TableContent::formatted(
        &[
            &["Verb", "Honorific (Respect)", "Extra-Modest (Humble/Polite)"],
            &["行く/来る", "いらっしゃいます", "<b>参 (まい) ります</b>"],
            &["言う", "おっしゃいます", "<b>申 (もう) します</b>"],
            &["する", "なさいます", "<b>いたします</b>"],
            &["食べる/飲む", "召 (め) し上 (あ) がります", "<b>いただきます</b>"],
            &["いる", "いらっしゃいます", "<b>おります</b>"],
        ],
        &[120.0, 160.0, 160.0],
    )?
    .with_cell_style(ANSWER_TABLE_STYLE);

    let arrow_line = "&rarr; __________________________________________________________________";
    let content = vec![
        ContentItem::title("Genki II - Lesson 19 & 20 Review"),
        ContentItem::text(NAME_DATE),
        ContentItem::spacer(10.0),
        ContentItem::header("I. Honorific vs. Extra-Modest Verbs"),
        ContentItem::text("Fill in the correct Special Verbs. Pay attention to the subject!"),
        ContentItem::spacer(5.0),
        ContentItem::table(verbs),
        ContentItem::header("II. Lesson 19 Grammar Review"),
        ContentItem::text("<b>1. Respectful Advice (お〜ください):</b> You work at a station."),
        ContentItem::text("Please take a ticket (切符 (きっぷ) を取 (と) る)."),
        ContentItem::text(arrow_line),
        ContentItem::spacer(8.0),
        ContentItem::text(
            "<b>2. Gratitude & Gladness:</b> You are talking with a friend. Translate the following.",
        ),
        ContentItem::text(
            "Thank you for helping (手伝 (てつだ) う). I am glad I did not give up (あきらめる).",
        ),
        ContentItem::text(arrow_line),
        ContentItem::spacer(8.0),
        ContentItem::text("<b>3. Expectations (〜はずです):</b>"),
        ContentItem::text("Today is Sunday, so the banks should be closed (閉 (し) まっている)."),
        ContentItem::text("&rarr; 今日は日曜日ですから、______________________________________________"),
        ContentItem::header("III. Lesson 20 Humble Expressions (謙譲語 I)"),
        ContentItem::text(
            "Change the verbs to Humble Form: <font color=darkblue>お + Stem + する</font>",
        ),
        ContentItem::spacer(5.0),
        ContentItem::text("<b>1. I (humbly) borrowed a book from the professor.</b>"),
        ContentItem::text("&rarr; 先生に本を (借 (か) りる) ______________________________ ました。"),
        ContentItem::spacer(8.0),
        ContentItem::text("<b>2. I (humbly) met the professor yesterday.</b>"),
        ContentItem::text("&rarr; 昨日、先生に (会 (あ) う) ______________________________ ました。"),
        ContentItem::spacer(8.0),
        ContentItem::page_break(),
        ContentItem::title("ANSWER KEY: Genki II L19-20 Review"),
        ContentItem::header("<b>I. Verb Review Table</b>"),
        ContentItem::table(answers),
        ContentItem::header("<b>II. Lesson 19 Review</b>"),
        ContentItem::text("1. 切符をお取りください (きっぷをおとりください)"),
        ContentItem::text("2. 手伝ってくれてありがとう。あきらめなくてよかったです。"),
        ContentItem::text("3. 銀行は閉まっているはずです (ぎんこうはしまっているはずです)"),
        ContentItem::header("<b>III. Lesson 20 Humble Expressions</b>"),
        ContentItem::text("1. お借りしました (おかりしました)"),
        ContentItem::text("2. お会いしました (おあいしました)"),
    ];

    Ok(Worksheet {
        filename: "Genki_L19_20_Review_Worksheet.pdf",
        page: PageLayout::a4(50.0),
        styles,
        table_style: TableStyle::default().trailing_space(0.0),
        content,
        requires_font: false,
    })
}
