//! `[build]` section configuration.
//!
//! Contains build settings: paths, data sources, minification, RSS and sitemap.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Enums
// ============================================================================

/// How blog posts are stored on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSourceKind {
    /// `<posts>/<id>.md`, each with a full front matter header (default).
    #[default]
    Frontmatter,
    /// Metadata in a JSON manifest, bodies in `<posts>/<id>.md`.
    Manifest,
    /// A single JSON array of complete posts.
    Json,
    /// The sample posts built into the binary. No files are read.
    Static,
}

// ============================================================================
// Main BuildConfig
// ============================================================================

/// `[build]` section in bedbug.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// output = "public"
/// minify = true
///
/// [build.data]
/// hotels = "data/hotels.json"
///
/// [build.blog]
/// source = "manifest"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Static assets directory, copied verbatim into the output.
    #[serde(default = "defaults::build::assets")]
    #[educe(Default = defaults::build::assets())]
    pub assets: PathBuf,

    /// Static page directory (`about.md`, `report.md`, ...).
    #[serde(default = "defaults::build::pages")]
    #[educe(Default = defaults::build::pages())]
    pub pages: PathBuf,

    /// Minify HTML output (removes whitespace).
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Clear output directory before each build.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,

    /// Hotel snapshot location.
    #[serde(default)]
    pub data: DataConfig,

    /// Blog post source.
    #[serde(default)]
    pub blog: BlogConfig,

    /// RSS feed generation settings.
    #[serde(default)]
    pub rss: RssConfig,

    /// Sitemap generation settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

// ============================================================================
// Sub-configurations
// ============================================================================

/// `[build.data]` section
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// JSON array of hotel records.
    #[serde(default = "defaults::build::data::hotels")]
    #[educe(Default = defaults::build::data::hotels())]
    pub hotels: PathBuf,
}

/// `[build.blog]` section
///
/// Only the paths relevant to `source` are read.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BlogConfig {
    #[serde(default)]
    pub source: PostSourceKind,

    /// Directory of `<id>.md` files (`frontmatter` and `manifest`).
    #[serde(default = "defaults::build::blog::posts")]
    #[educe(Default = defaults::build::blog::posts())]
    pub posts: PathBuf,

    /// Metadata array (`manifest`).
    #[serde(default = "defaults::build::blog::manifest")]
    #[educe(Default = defaults::build::blog::manifest())]
    pub manifest: PathBuf,

    /// Complete posts array (`json`).
    #[serde(default = "defaults::build::blog::json")]
    #[educe(Default = defaults::build::blog::json())]
    pub json: PathBuf,
}

/// `[build.rss]` section - RSS feed generation configuration.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RssConfig {
    /// Enable RSS feed generation.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub enable: bool,

    /// Output path for RSS feed file.
    #[serde(default = "defaults::build::rss::path")]
    #[educe(Default = defaults::build::rss::path())]
    pub path: PathBuf,
}

/// `[build.sitemap]` section
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SitemapConfig {
    #[serde(default = "defaults::r#true")]
    #[educe(Default = defaults::r#true())]
    pub enable: bool,

    /// Output path for the sitemap file.
    #[serde(default = "defaults::build::sitemap::path")]
    #[educe(Default = defaults::build::sitemap::path())]
    pub path: PathBuf,
}

// ============================================================================
// Tests
// ============================================================================
