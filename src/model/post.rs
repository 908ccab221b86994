//! Blog posts and static informational pages.

use serde::{Deserialize, Serialize};

/// A blog post.
///
/// `content` is optional because some sources deliver metadata first and the
/// body from a separate file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub author: String,
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    pub category: String,
    pub excerpt: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl BlogPost {
    /// Body text, empty when not loaded.
    pub fn body(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

/// A static page such as "about" or "report", authored as front matter + Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPage {
    /// File stem, used as the URL segment.
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub body: String,
}
