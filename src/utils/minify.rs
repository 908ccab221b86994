//! Output minification for HTML pages and XML feeds.

use std::{borrow::Cow, sync::LazyLock};

/// Output document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinifyType {
    Html,
    Xml,
}

static HTML_CFG: LazyLock<minify_html::Cfg> = LazyLock::new(|| {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg
});

/// Minify `content` when `enabled`, otherwise borrow it unchanged.
pub fn minify(kind: MinifyType, content: &[u8], enabled: bool) -> Cow<'_, [u8]> {
    if !enabled {
        return Cow::Borrowed(content);
    }
    match kind {
        MinifyType::Html => Cow::Owned(minify_html::minify(content, &HTML_CFG)),
        MinifyType::Xml => minify_xml(content),
    }
}

/// Drop indentation and line breaks between elements.
///
/// Non-UTF-8 input is returned untouched.
fn minify_xml(xml: &[u8]) -> Cow<'_, [u8]> {
    let Ok(text) = std::str::from_utf8(xml) else {
        return Cow::Borrowed(xml);
    };
    let joined: String = text.lines().map(str::trim).collect();
    Cow::Owned(joined.into_bytes())
}
