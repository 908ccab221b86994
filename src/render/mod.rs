//! HTML rendering for every route of the site.
//!
//! | Route                       | Renderer                  |
//! |-----------------------------|---------------------------|
//! | `/`                         | [`pages::directory`]      |
//! | `/status/<status>/`         | [`pages::directory`]      |
//! | `/hotel/<id>/`              | [`pages::hotel`]          |
//! | `/blog/`                    | [`pages::blog_index`]     |
//! | `/blog/category/<slug>/`    | [`pages::blog_index`]     |
//! | `/blog/<id>/`               | [`pages::post`]           |
//! | `/<page>/`                  | [`pages::static_page`]    |
//! | `/404.html`                 | [`pages::not_found`]      |

pub mod head;
pub mod jsonld;
pub mod layout;
pub mod pages;

pub use head::{Document, Head};
pub use layout::{Layout, NavLink};

use crate::model::Status;
use crate::view::CategoryFilter;

/// Site-relative URLs. Record ids are percent-encoded as one segment.
pub mod routes {
    use super::*;
    use urlencoding::encode;

    pub const HOME: &str = "/";
    pub const BLOG: &str = "/blog/";
    pub const STYLESHEET: &str = "/style.css";
    pub const NOT_FOUND: &str = "/404.html";
    pub const API_HOTELS: &str = "/api/hotels";

    /// First segments owned by generated routes. Static pages cannot use them.
    const RESERVED: &[&str] = &["api", "blog", "data", "hotel", "status"];

    pub fn is_reserved(slug: &str) -> bool {
        RESERVED.iter().any(|r| r.eq_ignore_ascii_case(slug))
    }

    pub fn hotel(id: &str) -> String {
        format!("/hotel/{}/", encode(id))
    }

    pub fn status(status: Status) -> String {
        format!("/status/{}/", status.slug())
    }

    pub fn post(id: &str) -> String {
        format!("/blog/{}/", encode(id))
    }

    pub fn category(filter: &CategoryFilter) -> String {
        match filter.slug() {
            Some(slug) => format!("/blog/category/{slug}/"),
            None => BLOG.to_owned(),
        }
    }

    pub fn page(slug: &str) -> String {
        format!("/{}/", encode(slug))
    }
}
