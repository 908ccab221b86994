//! Sitemap of every rendered route.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://bugs.example.org/hotel/grand-plaza/</loc>
//!     <lastmod>2024-07-10</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::{
    config::SiteConfig,
    log,
    utils::{
        date::is_iso_date,
        minify::{MinifyType, minify},
    },
};
use anyhow::{Context, Result};
use std::fs;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One page in the sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// Site-relative route, e.g. `/blog/`.
    pub route: String,
    /// Record date, kept only when it is a valid `YYYY-MM-DD`.
    pub lastmod: Option<String>,
}

impl SitemapEntry {
    pub fn new(route: impl Into<String>, lastmod: Option<&str>) -> Self {
        Self {
            route: route.into(),
            lastmod: lastmod.filter(|d| is_iso_date(d)).map(str::to_owned),
        }
    }
}

/// Write the sitemap if `[build.sitemap].enable` is set.
pub fn build_sitemap(config: &SiteConfig, entries: &[SitemapEntry]) -> Result<()> {
    if !config.build.sitemap.enable {
        return Ok(());
    }

    let xml = sitemap_xml(config, entries);
    let xml = minify(MinifyType::Xml, xml.as_bytes(), config.build.minify);
    let path = config.paths().output_dir().join(&config.build.sitemap.path);

    fs::write(&path, &*xml)
        .with_context(|| format!("Failed to write sitemap to {}", path.display()))?;

    log!("sitemap"; "{} urls", entries.len());
    Ok(())
}

fn sitemap_xml(config: &SiteConfig, entries: &[SitemapEntry]) -> String {
    let mut xml = String::with_capacity(256 + entries.len() * 96);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{SITEMAP_NS}\">\n"));
    for entry in entries {
        xml.push_str("  <url>\n");
        let loc = config.base.absolute(&entry.route);
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&loc)));
        if let Some(lastmod) = &entry.lastmod {
            xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
        }
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
