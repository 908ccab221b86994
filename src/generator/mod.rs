//! Machine-readable outputs generated alongside the HTML pages.

pub mod rss;
pub mod sitemap;

pub use rss::build_rss;
pub use sitemap::{SitemapEntry, build_sitemap};
