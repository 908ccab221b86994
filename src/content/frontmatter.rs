//! Front matter parsing for posts and pages.
//!
//! Accepted shape:
//!
//! ```text
//! ---
//! id: travel-safe
//! title: 'Travel Safe: Top 5 Tips'
//! ---
//! Body text.
//! ```
//!
//! This is deliberately not YAML: every metadata line is a flat `key: value`
//! pair split on the first colon, so titles containing colons need no quoting.

use crate::model::{BlogPost, StaticPage};
use std::collections::BTreeMap;
use thiserror::Error;

/// Delimiter line bounding the metadata block.
const DELIMITER: &str = "---";

/// Fields a blog post must declare, in serialization order.
pub const POST_FIELDS: [&str; 7] = [
    "id", "title", "author", "date", "category", "excerpt", "image",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrontMatterError {
    #[error("no frontmatter block")]
    Format,

    #[error("missing required field(s): {}", .0.join(", "))]
    Validation(Vec<&'static str>),
}

/// Raw metadata fields plus the trimmed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    fields: BTreeMap<String, String>,
    body: &'a str,
}

impl<'a> FrontMatter<'a> {
    /// Split `raw` at the first two delimiter lines and parse the metadata between them.
    pub fn parse(raw: &'a str) -> Result<Self, FrontMatterError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        let (meta, body) = split_blocks(raw).ok_or(FrontMatterError::Format)?;

        let fields = meta
            .lines()
            .filter_map(|line| line.split_once(':'))
            .filter_map(|(key, value)| {
                let key = key.trim();
                (!key.is_empty()).then(|| (key.to_owned(), unquote(value.trim()).to_owned()))
            })
            .collect();

        Ok(Self {
            fields,
            body: body.trim(),
        })
    }

    /// Value of `key`, if declared.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Declared, non-empty value of `key`.
    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub const fn body(&self) -> &'a str {
        self.body
    }

    /// Names from `required` that are absent or empty.
    pub fn missing(&self, required: &[&'static str]) -> Vec<&'static str> {
        required
            .iter()
            .copied()
            .filter(|key| self.non_empty(key).is_none())
            .collect()
    }
}

/// Locate the first two delimiter lines.
///
/// Returns the text strictly between them and the text strictly after the second.
fn split_blocks(raw: &str) -> Option<(&str, &str)> {
    let mut delimiters = raw
        .split_inclusive('\n')
        .scan(0usize, |offset, line| {
            let start = *offset;
            *offset += line.len();
            Some((start, *offset, line))
        })
        .filter(|(_, _, line)| line.trim() == DELIMITER);

    let (_, meta_start, _) = delimiters.next()?;
    let (meta_end, body_start, _) = delimiters.next()?;
    Some((&raw[meta_start..meta_end], &raw[body_start..]))
}

/// Strip one layer of matching single or double quotes.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(b'"'), Some(b'"')) | (Some(b'\''), Some(b'\'')) if value.len() >= 2 => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

/// Quote `value` when parsing it back would otherwise trim or unquote it.
fn quote(value: &str) -> String {
    if value.is_empty() || value.trim() != value || unquote(value).len() != value.len() {
        format!("\"{value}\"")
    } else {
        value.to_owned()
    }
}

// ============================================================================
// Typed Records
// ============================================================================

/// Parse a blog post. Every field in [`POST_FIELDS`] must be present and non-empty.
pub fn parse_post(raw: &str) -> Result<BlogPost, FrontMatterError> {
    let fm = FrontMatter::parse(raw)?;
    let missing = fm.missing(&POST_FIELDS);
    if !missing.is_empty() {
        return Err(FrontMatterError::Validation(missing));
    }

    let field = |key: &str| fm.get(key).unwrap_or_default().to_owned();
    Ok(BlogPost {
        id: field("id"),
        title: field("title"),
        author: field("author"),
        date: field("date"),
        category: field("category"),
        excerpt: field("excerpt"),
        image: field("image"),
        content: Some(fm.body().to_owned()),
    })
}

/// Serialize a post back into front matter form.
///
/// Metadata values must be single-line; the body is written as-is.
pub fn serialize_post(post: &BlogPost) -> String {
    let values = [
        &post.id,
        &post.title,
        &post.author,
        &post.date,
        &post.category,
        &post.excerpt,
        &post.image,
    ];

    let mut out = String::with_capacity(256 + post.body().len());
    out.push_str(DELIMITER);
    out.push('\n');
    for (key, value) in POST_FIELDS.iter().zip(values) {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(&quote(value));
        out.push('\n');
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(post.body());
    out.push('\n');
    out
}

/// Parse a static page. Only `title` is required.
pub fn parse_page(slug: &str, raw: &str) -> Result<StaticPage, FrontMatterError> {
    let fm = FrontMatter::parse(raw)?;
    let missing = fm.missing(&["title"]);
    if !missing.is_empty() {
        return Err(FrontMatterError::Validation(missing));
    }

    Ok(StaticPage {
        slug: slug.to_owned(),
        title: fm.get("title").unwrap_or_default().to_owned(),
        description: fm.non_empty("description").map(str::to_owned),
        body: fm.body().to_owned(),
    })
}
