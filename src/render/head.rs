//! Scoped document head: title, meta tags, theme, structured data.
//!
//! A page applies its [`Head`] with [`Document::scope`]; the returned guard
//! restores the previous head when dropped, so nothing a page sets can leak
//! into the next one rendered with the same document.

use super::jsonld;
use crate::config::{BaseConfig, Theme};
use crate::utils::html::{self, HtmlWriter};
use anyhow::Result;
use serde_json::Value;
use std::ops::{Deref, DerefMut};

/// Applies the stored theme before first paint.
const THEME_INIT: &str = "(function(){try{var t=localStorage.getItem('theme');\
if(t){document.documentElement.className=t;}}catch(e){}})();";

/// Head values a page sets. `None` / empty keeps the enclosing value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Head {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub canonical: Option<String>,
    pub theme: Option<Theme>,
    pub json_ld: Vec<Value>,
}

impl Head {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        let image = image.into();
        if !image.is_empty() {
            self.image = Some(image);
        }
        self
    }

    pub fn canonical(mut self, url: Option<String>) -> Self {
        self.canonical = url;
        self
    }

    pub fn json_ld(mut self, data: Value) -> Self {
        self.json_ld.push(data);
        self
    }

    /// `self` layered over `outer`.
    fn over(self, outer: &Head) -> Head {
        Head {
            title: self.title.or_else(|| outer.title.clone()),
            description: self.description.or_else(|| outer.description.clone()),
            image: self.image.or_else(|| outer.image.clone()),
            canonical: self.canonical.or_else(|| outer.canonical.clone()),
            theme: self.theme.or(outer.theme),
            json_ld: if self.json_ld.is_empty() {
                outer.json_ld.clone()
            } else {
                self.json_ld
            },
        }
    }
}

/// Head state for one rendered page, seeded with site defaults.
#[derive(Debug, Clone)]
pub struct Document {
    site_title: String,
    language: String,
    head: Head,
}

impl Document {
    pub fn new(base: &BaseConfig) -> Self {
        Self {
            site_title: base.title.clone(),
            language: base.language.clone(),
            head: Head {
                description: Some(base.description.clone()).filter(|d| !d.is_empty()),
                theme: Some(base.theme),
                ..Head::default()
            },
        }
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    /// Apply `head` until the returned guard is dropped.
    pub fn scope(&mut self, head: Head) -> HeadScope<'_> {
        let merged = head.over(&self.head);
        let previous = std::mem::replace(&mut self.head, merged);
        HeadScope {
            doc: self,
            previous: Some(previous),
        }
    }

    /// `<page title> | <site title>`, or the site title alone.
    pub fn title(&self) -> String {
        match &self.head.title {
            Some(title) => format!("{title} | {}", self.site_title),
            None => self.site_title.clone(),
        }
    }

    pub fn site_title(&self) -> &str {
        &self.site_title
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn theme(&self) -> Theme {
        self.head.theme.unwrap_or_default()
    }

    /// Write the `<head>` element.
    pub fn write_head(&self, w: &mut HtmlWriter, stylesheet: &str) -> Result<()> {
        let title = self.title();

        html::write_start(w, "head", &[])?;
        html::write_empty(w, "meta", &[("charset", "utf-8")])?;
        html::write_meta_tag(w, "viewport", "width=device-width, initial-scale=1")?;
        html::write_text_element(w, "title", &[], &title)?;

        html::write_meta_property(w, "og:title", &title)?;
        if let Some(description) = &self.head.description {
            html::write_meta_tag(w, "description", description)?;
            html::write_meta_property(w, "og:description", description)?;
        }
        if let Some(image) = &self.head.image {
            html::write_meta_property(w, "og:image", image)?;
        }
        if let Some(url) = &self.head.canonical {
            html::write_empty(w, "link", &[("rel", "canonical"), ("href", url)])?;
        }

        html::write_stylesheet_link(w, stylesheet)?;
        html::write_inline_script(w, None, THEME_INIT)?;
        for data in &self.head.json_ld {
            html::write_inline_script(w, Some("application/ld+json"), &jsonld::script_body(data))?;
        }
        html::write_end(w, "head")
    }
}

/// Restores the enclosing head on drop.
pub struct HeadScope<'a> {
    doc: &'a mut Document,
    previous: Option<Head>,
}

impl Deref for HeadScope<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        self.doc
    }
}

impl DerefMut for HeadScope<'_> {
    fn deref_mut(&mut self) -> &mut Document {
        self.doc
    }
}

impl Drop for HeadScope<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.doc.head = previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Document {
        let base = BaseConfig {
            title: "BedBug Tracker".into(),
            description: "Hotel pest reports".into(),
            theme: Theme::Dark,
            ..BaseConfig::default()
        };
        Document::new(&base)
    }

    fn head_html(doc: &Document) -> String {
        let mut w = html::new_writer();
        doc.write_head(&mut w, "/style.css").unwrap();
        html::into_string(w)
    }

    #[test]
    fn test_scope_restores_on_drop() {
        let mut doc = document();
        assert_eq!(doc.title(), "BedBug Tracker");

        {
            let scoped = doc.scope(
                Head::titled("Grand Plaza")
                    .description("Pest report details")
                    .json_ld(json!({ "@type": "Hotel" })),
            );
            assert_eq!(scoped.title(), "Grand Plaza | BedBug Tracker");
            assert_eq!(scoped.head().json_ld.len(), 1);
        }

        assert_eq!(doc.title(), "BedBug Tracker");
        assert_eq!(doc.head().description.as_deref(), Some("Hotel pest reports"));
        assert!(doc.head().json_ld.is_empty());
    }

    #[test]
    fn test_nested_scopes() {
        let mut doc = document();
        let mut outer = doc.scope(Head::titled("Blog"));
        {
            let inner = outer.scope(Head::default().description("Inner only"));
            // Title inherited from the enclosing scope
            assert_eq!(inner.title(), "Blog | BedBug Tracker");
            assert_eq!(inner.head().description.as_deref(), Some("Inner only"));
        }
        assert_eq!(outer.head().description.as_deref(), Some("Hotel pest reports"));
        drop(outer);
        assert_eq!(doc.head(), &document().head);
    }

    #[test]
    fn test_theme_seeded_from_config() {
        let mut doc = document();
        assert_eq!(doc.theme(), Theme::Dark);
        let scoped = doc.scope(Head {
            theme: Some(Theme::Light),
            ..Head::default()
        });
        assert_eq!(scoped.theme(), Theme::Light);
    }

    #[test]
    fn test_write_head() {
        let mut doc = document();
        let scoped = doc.scope(
            Head::titled("A & B")
                .image("/a.png")
                .json_ld(json!({ "name": "</script>" })),
        );
        let out = head_html(&scoped);

        assert!(out.contains("<title>A &amp; B | BedBug Tracker</title>"));
        assert!(out.contains(r#"content="Hotel pest reports""#));
        assert!(out.contains(r#"property="og:image""#));
        assert!(out.contains(r#"<script type="application/ld+json">"#));
        assert!(!out.contains("\"</script>\""));
        assert!(out.contains("localStorage"));
    }

    #[test]
    fn test_empty_image_ignored() {
        assert_eq!(Head::titled("x").image("").image, None);
    }
}
