//! HTML fragment writing on top of `quick-xml`.
//!
//! Text and attribute values are always escaped by the writer; only
//! [`write_raw`] bypasses escaping and must be fed trusted markup.

use anyhow::Result;
use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{Cursor, Write};

/// In-memory HTML writer.
pub type HtmlWriter = Writer<Cursor<Vec<u8>>>;

/// Attribute list as `(name, value)` pairs.
pub type Attrs<'a> = &'a [(&'a str, &'a str)];

#[inline]
pub fn new_writer() -> HtmlWriter {
    Writer::new(Cursor::new(Vec::with_capacity(4096)))
}

/// Consume the writer and return its markup.
pub fn into_string(writer: HtmlWriter) -> String {
    let bytes = writer.into_inner().into_inner();
    // Only `&str` input is ever written
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

// ============================================================================
// Element Writers
// ============================================================================

fn element<'a>(tag: &'a str, attrs: Attrs<'_>) -> BytesStart<'a> {
    let mut elem = BytesStart::new(tag);
    for &(key, value) in attrs {
        elem.push_attribute((key, value));
    }
    elem
}

/// Write an opening tag.
#[inline]
pub fn write_start(writer: &mut HtmlWriter, tag: &str, attrs: Attrs<'_>) -> Result<()> {
    writer.write_event(Event::Start(element(tag, attrs)))?;
    Ok(())
}

#[inline]
pub fn write_end(writer: &mut HtmlWriter, tag: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Write escaped text.
#[inline]
pub fn write_text(writer: &mut HtmlWriter, text: &str) -> Result<()> {
    writer.write_event(Event::Text(BytesText::new(text)))?;
    Ok(())
}

/// Write a simple text element (e.g., `<title>text</title>`).
pub fn write_text_element(
    writer: &mut HtmlWriter,
    tag: &str,
    attrs: Attrs<'_>,
    text: &str,
) -> Result<()> {
    write_start(writer, tag, attrs)?;
    write_text(writer, text)?;
    write_end(writer, tag)
}

/// Write a void element (e.g., `<meta .../>`).
#[inline]
pub fn write_empty(writer: &mut HtmlWriter, tag: &str, attrs: Attrs<'_>) -> Result<()> {
    writer.write_event(Event::Empty(element(tag, attrs)))?;
    Ok(())
}

/// Write a link with escaped text.
#[inline]
pub fn write_link(writer: &mut HtmlWriter, href: &str, class: &str, text: &str) -> Result<()> {
    if class.is_empty() {
        write_text_element(writer, "a", &[("href", href)], text)
    } else {
        write_text_element(writer, "a", &[("href", href), ("class", class)], text)
    }
}

/// Write a meta tag.
#[inline]
pub fn write_meta_tag(writer: &mut HtmlWriter, name: &str, content: &str) -> Result<()> {
    write_empty(writer, "meta", &[("name", name), ("content", content)])
}

/// Write an Open Graph style `property` meta tag.
#[inline]
pub fn write_meta_property(writer: &mut HtmlWriter, property: &str, content: &str) -> Result<()> {
    write_empty(writer, "meta", &[("property", property), ("content", content)])
}

/// Write a stylesheet link element.
#[inline]
pub fn write_stylesheet_link(writer: &mut HtmlWriter, href: &str) -> Result<()> {
    write_empty(writer, "link", &[("rel", "stylesheet"), ("href", href)])
}

/// Write a `<script>` element with trusted inline content.
pub fn write_inline_script(writer: &mut HtmlWriter, kind: Option<&str>, body: &str) -> Result<()> {
    match kind {
        Some(kind) => write_start(writer, "script", &[("type", kind)])?,
        None => write_start(writer, "script", &[])?,
    }
    write_raw(writer, body)?;
    write_end(writer, "script")
}

/// Write trusted markup verbatim.
#[inline]
pub fn write_raw(writer: &mut HtmlWriter, html: &str) -> Result<()> {
    writer.get_mut().write_all(html.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut HtmlWriter) -> Result<()>) -> String {
        let mut writer = new_writer();
        f(&mut writer).unwrap();
        into_string(writer)
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render(|w| write_text_element(w, "p", &[], "<b>Tom & Jerry</b>"));
        assert!(html.starts_with("<p>"));
        assert!(html.contains("&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;"));
        assert!(html.ends_with("</p>"));
    }

    #[test]
    fn test_attributes_are_escaped() {
        let html = render(|w| write_link(w, "/a?x=1&y=\"2\"", "", "go"));
        assert!(html.contains("href=\"/a?x=1&amp;y=&quot;2&quot;\""));
        assert!(!html.contains("class"));
    }

    #[test]
    fn test_write_meta_tag() {
        let html = render(|w| write_meta_tag(w, "description", "Clean rooms"));
        assert!(html.contains("<meta"));
        assert!(html.contains("name=\"description\""));
        assert!(html.contains("content=\"Clean rooms\""));
    }

    #[test]
    fn test_write_stylesheet_link() {
        let html = render(|w| write_stylesheet_link(w, "/style.css"));
        assert!(html.contains("rel=\"stylesheet\""));
        assert!(html.contains("href=\"/style.css\""));
    }

    #[test]
    fn test_inline_script_is_raw() {
        let html = render(|w| write_inline_script(w, Some("application/ld+json"), r#"{"a":"b&c"}"#));
        assert!(html.contains(r#"<script type="application/ld+json">{"a":"b&c"}</script>"#));
    }
}
