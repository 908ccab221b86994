//! `[base]` section configuration.
//!
//! Contains basic site information like title, author, description, etc.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// Initial color scheme written into the `<html>` class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow `prefers-color-scheme` (default).
    #[default]
    System,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

/// `[base]` section in bedbug.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "BedBug Tracker"
/// description = "Find pest-free hotels"
/// url = "https://bedbugs.example.org"
/// data_url = "https://github.com/example/bedbug-data/edit/main/hotels.json"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title, appended to every page title.
    #[serde(default = "defaults::base::title")]
    #[educe(Default = defaults::base::title())]
    pub title: String,

    /// Short line shown under the header logo.
    #[serde(default = "defaults::base::tagline")]
    #[educe(Default = defaults::base::tagline())]
    pub tagline: String,

    /// Site description for SEO meta tags.
    #[serde(default)]
    pub description: String,

    /// Author name for rss feed and meta tags.
    #[serde(default = "defaults::base::author")]
    #[educe(Default = defaults::base::author())]
    pub author: String,

    /// Author email for rss feed.
    #[serde(default = "defaults::base::email")]
    #[educe(Default = defaults::base::email())]
    pub email: String,

    /// Base URL for absolute links in rss/sitemap/structured data.
    /// Required when `[build.rss].enable = true`.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// BCP 47 language code (e.g., "en", "en-US").
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,

    /// Copyright notice for site footer.
    #[serde(default)]
    pub copyright: String,

    /// Initial color scheme.
    #[serde(default)]
    pub theme: Theme,

    /// Where visitors contribute reports (edit link to the published data file).
    #[serde(default)]
    pub data_url: Option<String>,

    /// Source repository linked from the footer.
    #[serde(default)]
    pub repo_url: Option<String>,
}

impl BaseConfig {
    /// `base.url` without a trailing slash, or empty.
    pub fn url_root(&self) -> &str {
        self.url.as_deref().unwrap_or_default().trim_end_matches('/')
    }

    /// Absolute URL for a site path such as `/blog/`.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.url_root(), path)
    }
}
