//! Inline markup for paragraph text.
//!
//! Supports the small tag vocabulary the worksheets are written in:
//! `<b>`, `<i>`, `<font color=.. size=.. face=..>` and `<br/>`, plus the usual
//! character entities. A bare `&` that does not start an entity is kept as
//! text, so `Q&A` needs no escaping. The same goes for a `<` that cannot open
//! a tag, as in `a < b`.

use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_till, take_till1, take_while1};
use nom::character::complete::{char, multispace0, multispace1};
use nom::combinator::{map, map_opt, opt, value};
use nom::multi::many0;
use nom::sequence::{delimited, preceded, terminated};
use nom::{IResult, Parser};
use sheets_style::{FontStyle, FontWeight};
use sheets_types::Color;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarkupError {
    #[error("Unknown tag <{0}>")]
    UnknownTag(String),
    #[error("Closing tag </{found}> does not match open tag <{expected}>")]
    MismatchedClose { expected: String, found: String },
    #[error("Closing tag </{0}> has no matching open tag")]
    UnopenedClose(String),
    #[error("Tag <{0}> is never closed")]
    Unclosed(String),
    #[error("Invalid value '{value}' for attribute '{attribute}'")]
    InvalidAttribute { attribute: String, value: String },
    #[error("Malformed markup near '{0}'")]
    Syntax(String),
}

/// Overrides a tag applies on top of the enclosing paragraph style.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpanStyle {
    pub weight: Option<FontWeight>,
    pub style: Option<FontStyle>,
    pub color: Option<Color>,
    pub size: Option<f32>,
    pub face: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InlineNode {
    Text(String),
    Span {
        style: SpanStyle,
        children: Vec<InlineNode>,
    },
    LineBreak,
}

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Char(char),
    Open {
        name: String,
        attributes: Vec<(String, &'a str)>,
    },
    Close(String),
    Break,
}

fn name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric()).parse(input)
}

fn attribute_value(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('\''), take_till(|c: char| c == '\''), char('\'')),
        delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
        take_till1(|c: char| c.is_whitespace() || c == '>'),
    ))
    .parse(input)
}

fn attribute(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(
        multispace1,
        (
            terminated(name, (multispace0, char('='), multispace0)),
            attribute_value,
        ),
    )
    .parse(input)
}

fn line_break(input: &str) -> IResult<&str, Token<'_>> {
    value(
        Token::Break,
        (char('<'), tag_no_case("br"), multispace0, opt(char('/')), char('>')),
    )
    .parse(input)
}

fn open_tag(input: &str) -> IResult<&str, Token<'_>> {
    map(
        (char('<'), name, many0(attribute), multispace0, char('>')),
        |(_, name, attributes, _, _)| Token::Open {
            name: name.to_ascii_lowercase(),
            attributes: attributes
                .into_iter()
                .map(|(key, raw)| (key.to_ascii_lowercase(), raw))
                .collect(),
        },
    )
    .parse(input)
}

fn close_tag(input: &str) -> IResult<&str, Token<'_>> {
    map(
        delimited(tag("</"), name, (multispace0, char('>'))),
        |name: &str| Token::Close(name.to_ascii_lowercase()),
    )
    .parse(input)
}

fn entity(input: &str) -> IResult<&str, Token<'_>> {
    map_opt(
        delimited(
            char('&'),
            take_while1(|c: char| c.is_ascii_alphanumeric() || c == '#'),
            char(';'),
        ),
        |name: &str| decode_entity(name).map(Token::Char),
    )
    .parse(input)
}

fn text(input: &str) -> IResult<&str, Token<'_>> {
    map(take_till1(|c: char| c == '<' || c == '&'), Token::Text).parse(input)
}

fn bare_ampersand(input: &str) -> IResult<&str, Token<'_>> {
    value(Token::Char('&'), char('&')).parse(input)
}

fn stray_lt(input: &str) -> IResult<&str, Token<'_>> {
    value(Token::Char('<'), char('<')).parse(input)
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        line_break,
        close_tag,
        open_tag,
        entity,
        text,
        bare_ampersand,
        stray_lt,
    ))
    .parse(input)
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse::<u32>().ok()?,
        };
        return char::from_u32(value);
    }
    let c = match name {
        "nbsp" => '\u{a0}',
        "rarr" | "rightarrow" => '\u{2192}',
        "larr" | "leftarrow" => '\u{2190}',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "hellip" => '\u{2026}',
        "times" => '\u{d7}',
        _ => return None,
    };
    Some(c)
}

fn snippet(rest: &str) -> String {
    rest.chars().take(24).collect()
}

fn tokenize(input: &str) -> Result<Vec<Token<'_>>, MarkupError> {
    let (rest, tokens) = many0(token)
        .parse(input)
        .map_err(|e| MarkupError::Syntax(e.to_string()))?;
    if !rest.is_empty() {
        return Err(MarkupError::Syntax(snippet(rest)));
    }
    Ok(tokens)
}

fn invalid(attribute: &str, value: &str) -> MarkupError {
    MarkupError::InvalidAttribute {
        attribute: attribute.to_string(),
        value: value.to_string(),
    }
}

fn span_style(name: &str, attributes: &[(String, &str)]) -> Result<SpanStyle, MarkupError> {
    let mut style = SpanStyle::default();
    match name {
        "b" | "strong" => style.weight = Some(FontWeight::Bold),
        "i" | "em" => style.style = Some(FontStyle::Italic),
        "font" | "span" => {
            for (key, raw) in attributes {
                match key.as_str() {
                    "color" | "textcolor" | "fg" => {
                        style.color = Some(Color::parse(raw).map_err(|_| invalid(key, raw))?);
                    }
                    "size" | "fontsize" => {
                        let size = raw
                            .trim()
                            .parse::<f32>()
                            .ok()
                            .filter(|s| s.is_finite() && *s > 0.0)
                            .ok_or_else(|| invalid(key, raw))?;
                        style.size = Some(size);
                    }
                    "face" | "name" | "fontname" => style.face = Some(raw.trim().to_string()),
                    // Unsupported presentation attributes are ignored.
                    _ => {}
                }
            }
        }
        other => return Err(MarkupError::UnknownTag(other.to_string())),
    }
    Ok(style)
}

fn push_text(children: &mut Vec<InlineNode>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(InlineNode::Text(last)) = children.last_mut() {
        last.push_str(text);
    } else {
        children.push(InlineNode::Text(text.to_string()));
    }
}

struct OpenSpan {
    tag: String,
    style: SpanStyle,
    children: Vec<InlineNode>,
}

/// Parses paragraph markup into a tree of inline nodes.
pub fn parse_markup(input: &str) -> Result<Vec<InlineNode>, MarkupError> {
    let mut root: Vec<InlineNode> = Vec::new();
    let mut stack: Vec<OpenSpan> = Vec::new();

    for token in tokenize(input)? {
        let children = match stack.last_mut() {
            Some(open) => &mut open.children,
            None => &mut root,
        };
        match token {
            Token::Text(s) => push_text(children, s),
            Token::Char(c) => push_text(children, c.encode_utf8(&mut [0; 4])),
            Token::Break => children.push(InlineNode::LineBreak),
            Token::Open { name, attributes } => {
                let style = span_style(&name, &attributes)?;
                stack.push(OpenSpan {
                    tag: name,
                    style,
                    children: Vec::new(),
                });
            }
            Token::Close(name) => {
                let open = stack.pop().ok_or_else(|| MarkupError::UnopenedClose(name.clone()))?;
                if open.tag != name {
                    return Err(MarkupError::MismatchedClose {
                        expected: open.tag,
                        found: name,
                    });
                }
                let parent = match stack.last_mut() {
                    Some(outer) => &mut outer.children,
                    None => &mut root,
                };
                parent.push(InlineNode::Span {
                    style: open.style,
                    children: open.children,
                });
            }
        }
    }

    if let Some(open) = stack.pop() {
        return Err(MarkupError::Unclosed(open.tag));
    }
    Ok(root)
}

/// Wraps literal text. Newlines become line breaks; nothing else is interpreted.
pub fn plain_text(input: &str) -> Vec<InlineNode> {
    let mut nodes = Vec::new();
    for (i, line) in input.split('\n').enumerate() {
        if i > 0 {
            nodes.push(InlineNode::LineBreak);
        }
        push_text(&mut nodes, line);
    }
    nodes
}

/// The text content of `nodes` with all formatting removed.
pub fn flatten_text(nodes: &[InlineNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            InlineNode::Text(text) => out.push_str(text),
            InlineNode::Span { children, .. } => out.push_str(&flatten_text(children)),
            InlineNode::LineBreak => out.push('\n'),
        }
    }
    out
}
