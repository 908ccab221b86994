//! Text content: front matter headers and the Markdown body subset.

pub mod frontmatter;
pub mod markdown;

pub use frontmatter::{FrontMatter, FrontMatterError, parse_page, parse_post, serialize_post};
