//! Loading the site's data: hotel snapshot, blog posts, static pages.
//!
//! Every load is recovered at the page boundary, so [`SiteData`] keeps each
//! failure next to the id it belongs to instead of aborting the build.

mod hotels;
mod pages;
mod posts;

pub use hotels::{AuditWarning, audit, fetch_hotels, parse_hotels, read_hotels};
pub use pages::load_pages;
pub use posts::{BUNDLED_POSTS, PostSource, from_config};

use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::log;
use crate::model::{BlogPost, Hotel, StaticPage};
use tokio::task;

/// One loaded record keyed by id, or why it could not be loaded.
pub type Entry<T> = (String, Result<T, SiteError>);

/// Everything a build renders from.
#[derive(Debug)]
pub struct SiteData {
    pub hotels: Result<Vec<Hotel>, SiteError>,
    /// `Err` when the post ids themselves could not be listed.
    pub posts: Result<Vec<Entry<BlogPost>>, SiteError>,
    pub pages: Vec<Entry<StaticPage>>,
}

impl SiteData {
    /// Successfully loaded posts.
    pub fn loaded_posts(&self) -> Vec<BlogPost> {
        self.posts
            .iter()
            .flatten()
            .filter_map(|(_, post)| post.as_ref().ok())
            .cloned()
            .collect()
    }

    /// Log load failures and hotel data-quality warnings.
    pub fn report(&self) {
        match &self.hotels {
            Ok(hotels) => {
                for warning in audit(hotels) {
                    log!("audit"; "{warning}");
                }
            }
            Err(err) => log!("error"; "{err}"),
        }

        match &self.posts {
            Ok(posts) => {
                for (id, err) in posts.iter().filter_map(|(id, r)| Some((id, r.as_ref().err()?))) {
                    log!("error"; "post `{id}`: {err}");
                }
            }
            Err(err) => log!("error"; "{err}"),
        }

        for (slug, err) in self.pages.iter().filter_map(|(s, r)| Some((s, r.as_ref().err()?))) {
            log!("error"; "page `{slug}`: {err}");
        }
    }
}

/// Load every post the source lists, each independently.
pub fn load_posts(source: &dyn PostSource) -> Result<Vec<Entry<BlogPost>>, SiteError> {
    let posts = source
        .ids()?
        .into_iter()
        .map(|id| {
            let post = source.get_post_by_id(&id);
            (id, post)
        })
        .collect();
    Ok(posts)
}

/// Load hotels, posts and pages concurrently.
pub async fn load_site(config: &SiteConfig) -> SiteData {
    let source = from_config(&config.build.blog);
    let pages_dir = config.build.pages.clone();

    let (hotels, posts, pages) = tokio::join!(
        fetch_hotels(&config.build.data.hotels),
        task::spawn_blocking(move || load_posts(source.as_ref())),
        task::spawn_blocking(move || load_pages(&pages_dir)),
    );

    SiteData {
        hotels,
        posts: posts.unwrap_or_else(|err| Err(SiteError::fetch("posts", err))),
        pages: pages.unwrap_or_else(|err| {
            log!("error"; "page loader stopped: {err}");
            Vec::new()
        }),
    }
}
