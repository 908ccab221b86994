//! Page shell: header, navigation, footer, theme toggle.

use super::head::Document;
use super::routes;
use crate::config::BaseConfig;
use crate::model::StaticPage;
use crate::utils::date::current_year;
use crate::utils::html::{self, HtmlWriter};
use anyhow::Result;

const THEME_TOGGLE: &str = "(function(){var b=document.getElementById('theme-toggle');\
if(!b)return;b.addEventListener('click',function(){var r=document.documentElement;\
var dark=r.classList.contains('dark')||(r.classList.contains('system')&&\
window.matchMedia('(prefers-color-scheme: dark)').matches);var t=dark?'light':'dark';\
r.className=t;try{localStorage.setItem('theme',t);}catch(e){}});})();";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: String,
    pub label: String,
}

impl NavLink {
    fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
        }
    }
}

/// Site-wide chrome shared by every page.
#[derive(Debug, Clone)]
pub struct Layout<'a> {
    pub base: &'a BaseConfig,
    pub nav: Vec<NavLink>,
    pub year: i32,
}

impl<'a> Layout<'a> {
    /// Home and Blog, then one entry per static page.
    pub fn new<'p>(base: &'a BaseConfig, pages: impl IntoIterator<Item = &'p StaticPage>) -> Self {
        let mut nav = vec![NavLink::new(routes::HOME, "Home"), NavLink::new(routes::BLOG, "Blog")];
        nav.extend(
            pages
                .into_iter()
                .filter(|page| !routes::is_reserved(&page.slug))
                .map(|page| NavLink::new(routes::page(&page.slug), &page.title)),
        );
        Self {
            base,
            nav,
            year: current_year(),
        }
    }

    pub fn document(&self) -> Document {
        Document::new(self.base)
    }

    /// Absolute URL for `path` when `[base].url` is set.
    pub fn canonical(&self, path: &str) -> Option<String> {
        self.base.url.as_ref().map(|_| self.base.absolute(path))
    }

    /// Complete HTML document around `main`. `active` is the current route.
    pub fn render(
        &self,
        doc: &Document,
        active: &str,
        main: impl FnOnce(&mut HtmlWriter) -> Result<()>,
    ) -> Result<String> {
        let mut w = html::new_writer();
        html::write_raw(&mut w, "<!DOCTYPE html>")?;
        html::write_start(
            &mut w,
            "html",
            &[("lang", doc.language()), ("class", doc.theme().as_str())],
        )?;
        doc.write_head(&mut w, routes::STYLESHEET)?;

        html::write_start(&mut w, "body", &[])?;
        self.write_header(&mut w, active)?;
        html::write_start(&mut w, "main", &[("class", "container")])?;
        main(&mut w)?;
        html::write_end(&mut w, "main")?;
        self.write_footer(&mut w)?;
        html::write_inline_script(&mut w, None, THEME_TOGGLE)?;
        html::write_end(&mut w, "body")?;

        html::write_end(&mut w, "html")?;
        Ok(html::into_string(w))
    }

    fn write_header(&self, w: &mut HtmlWriter, active: &str) -> Result<()> {
        html::write_start(w, "header", &[("class", "site-header")])?;
        html::write_start(w, "nav", &[("class", "container")])?;
        html::write_link(w, routes::HOME, "brand", &self.base.title)?;
        if !self.base.tagline.is_empty() {
            html::write_text_element(w, "span", &[("class", "tagline")], &self.base.tagline)?;
        }

        html::write_start(w, "ul", &[("class", "nav-links")])?;
        for link in &self.nav {
            html::write_start(w, "li", &[])?;
            let class = if is_active(&link.href, active) { "active" } else { "" };
            html::write_link(w, &link.href, class, &link.label)?;
            html::write_end(w, "li")?;
        }
        html::write_end(w, "ul")?;

        if let Some(data_url) = &self.base.data_url {
            html::write_link(w, data_url, "button contribute", "Contribute a report")?;
        }
        html::write_text_element(
            w,
            "button",
            &[("id", "theme-toggle"), ("type", "button"), ("aria-label", "Toggle theme")],
            "◐",
        )?;
        html::write_end(w, "nav")?;
        html::write_end(w, "header")
    }

    fn write_footer(&self, w: &mut HtmlWriter) -> Result<()> {
        html::write_start(w, "footer", &[("class", "site-footer")])?;
        let notice = if self.base.copyright.is_empty() {
            format!("© {} {}. All rights reserved.", self.year, self.base.title)
        } else {
            format!("© {}", self.base.copyright)
        };
        html::write_text_element(w, "p", &[], &notice)?;
        if let Some(repo_url) = &self.base.repo_url {
            html::write_start(w, "p", &[])?;
            html::write_link(w, repo_url, "", "Source on GitHub")?;
            html::write_end(w, "p")?;
        }
        html::write_end(w, "footer")
    }
}

/// Home is active only on itself; other entries also cover their subpages.
fn is_active(href: &str, active: &str) -> bool {
    if href == routes::HOME {
        active == routes::HOME || active.starts_with("/status/") || active.starts_with("/hotel/")
    } else {
        active.starts_with(href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(slug: &str, title: &str) -> StaticPage {
        StaticPage {
            slug: slug.into(),
            title: title.into(),
            description: None,
            body: String::new(),
        }
    }

    #[test]
    fn test_nav_order() {
        let base = BaseConfig::default();
        let pages = [page("about", "About"), page("report", "Report a Hotel")];
        let layout = Layout::new(&base, &pages);

        let labels: Vec<_> = layout.nav.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, ["Home", "Blog", "About", "Report a Hotel"]);
        assert_eq!(layout.nav[2].href, "/about/");
    }

    #[test]
    fn test_is_active() {
        assert!(is_active("/", "/"));
        assert!(is_active("/", "/hotel/a/"));
        assert!(!is_active("/", "/blog/"));
        assert!(is_active("/blog/", "/blog/category/guides/"));
        assert!(!is_active("/about/", "/blog/"));
    }

    #[test]
    fn test_render_shell() {
        let base = BaseConfig {
            title: "BedBug Tracker".into(),
            data_url: Some("https://github.com/x/data/edit/main/hotels.json".into()),
            ..BaseConfig::default()
        };
        let layout = Layout {
            base: &base,
            nav: Layout::new(&base, []).nav,
            year: 2025,
        };
        let doc = layout.document();
        let out = layout
            .render(&doc, "/blog/", |w| html::write_text_element(w, "h1", &[], "Hi"))
            .unwrap();

        assert!(out.starts_with("<!DOCTYPE html><html lang=\"en\" class=\"system\">"));
        assert!(out.contains("<h1>Hi</h1>"));
        assert!(out.contains(r#"<a href="/blog/" class="active">Blog</a>"#));
        assert!(out.contains("Contribute a report"));
        assert!(out.contains("© 2025 BedBug Tracker. All rights reserved."));
        assert!(out.ends_with("</html>"));
    }

    #[test]
    fn test_canonical_requires_base_url() {
        let mut base = BaseConfig::default();
        assert_eq!(Layout::new(&base, []).canonical("/blog/"), None);
        base.url = Some("https://x.org/".into());
        assert_eq!(
            Layout::new(&base, []).canonical("/blog/").as_deref(),
            Some("https://x.org/blog/")
        );
    }
}
