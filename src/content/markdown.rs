//! A deliberately small Markdown subset for post and page bodies.
//!
//! Supported: paragraphs, ordered lists (`1.` prefixes) and `**bold**` spans.
//! Everything else is plain text.

use crate::utils::html::{self, HtmlWriter};
use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

/// Leading `N.` item marker with optional surrounding whitespace.
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*([0-9]+)\.[ \t]*").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline<'a> {
    Text(&'a str),
    Bold(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    Paragraph(Vec<Inline<'a>>),
    OrderedList {
        start: u32,
        items: Vec<Vec<Inline<'a>>>,
    },
}

// ============================================================================
// Parsing
// ============================================================================

/// Split `body` into blocks. Never fails.
pub fn parse(body: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut lines: Vec<&str> = Vec::new();

    for line in body.lines() {
        if line.trim().is_empty() {
            if !lines.is_empty() {
                blocks.push(block(&lines));
                lines.clear();
            }
        } else {
            lines.push(line);
        }
    }
    if !lines.is_empty() {
        blocks.push(block(&lines));
    }
    blocks
}

fn block<'a>(lines: &[&'a str]) -> Block<'a> {
    let Some(first) = LIST_ITEM.captures(lines[0]) else {
        let text = lines.iter().map(|line| line.trim()).collect::<Vec<_>>();
        return Block::Paragraph(join_inlines(&text));
    };

    let start = first[1].parse().unwrap_or(1);
    let items = lines
        .iter()
        .map(|line| {
            let item = match LIST_ITEM.find(line) {
                Some(marker) => &line[marker.end()..],
                None => line.trim(),
            };
            inlines(item.trim_end())
        })
        .collect();
    Block::OrderedList { start, items }
}

/// Paragraph lines keep their line breaks as single spaces.
fn join_inlines<'a>(lines: &[&'a str]) -> Vec<Inline<'a>> {
    let mut spans = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            spans.push(Inline::Text(" "));
        }
        spans.extend(inlines(line));
    }
    spans
}

/// Match `**` pairs left to right. Unpaired or empty markers stay literal.
pub fn inlines(text: &str) -> Vec<Inline<'_>> {
    let mut spans = Vec::new();
    let mut plain = 0;
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find("**") {
        let inner = cursor + found + 2;
        let Some(len) = text[inner..].find("**") else {
            break;
        };
        if len == 0 {
            cursor = inner;
            continue;
        }
        let open = inner - 2;
        if plain < open {
            spans.push(Inline::Text(&text[plain..open]));
        }
        spans.push(Inline::Bold(&text[inner..inner + len]));
        cursor = inner + len + 2;
        plain = cursor;
    }

    if plain < text.len() {
        spans.push(Inline::Text(&text[plain..]));
    }
    spans
}

// ============================================================================
// HTML Output
// ============================================================================

/// Write `body` as escaped HTML.
pub fn write_html(writer: &mut HtmlWriter, body: &str) -> Result<()> {
    for block in parse(body) {
        match block {
            Block::Paragraph(spans) => {
                html::write_start(writer, "p", &[])?;
                write_inlines(writer, &spans)?;
                html::write_end(writer, "p")?;
            }
            Block::OrderedList { start, items } => {
                if start == 1 {
                    html::write_start(writer, "ol", &[])?;
                } else {
                    let start = start.to_string();
                    html::write_start(writer, "ol", &[("start", &start)])?;
                }
                for item in &items {
                    html::write_start(writer, "li", &[])?;
                    write_inlines(writer, item)?;
                    html::write_end(writer, "li")?;
                }
                html::write_end(writer, "ol")?;
            }
        }
    }
    Ok(())
}

fn write_inlines(writer: &mut HtmlWriter, spans: &[Inline<'_>]) -> Result<()> {
    for span in spans {
        match span {
            Inline::Text(text) => html::write_text(writer, text)?,
            Inline::Bold(text) => html::write_text_element(writer, "strong", &[], text)?,
        }
    }
    Ok(())
}
