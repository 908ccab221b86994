//! Site building orchestration.
//!
//! Renders every route of the loaded [`SiteData`] into the output directory.
//!
//! # Architecture
//!
//! ```text
//! build_all()
//!     │
//!     ├── load_site() ──► hotels, posts, pages (concurrently, tokio)
//!     │
//!     └── build_site()
//!             │
//!             ├── plan jobs ──► one per route
//!             ├── render + write in parallel (rayon) ──► index.html files
//!             ├── style.css, 404.html, data/hotels.json, assets
//!             └── sitemap, rss
//! ```
//!
//! Load failures never abort the build. They render error pages at the
//! affected routes; only I/O and rendering errors fail the build.

use crate::{
    config::{PathResolver, SiteConfig},
    error::SiteError,
    generator::{SitemapEntry, build_rss, build_sitemap},
    log,
    logger::ProgressBars,
    model::{BlogPost, Hotel, StaticPage},
    render::{Layout, pages, pages::BackTo, routes},
    source::{self, SiteData},
    utils::{
        minify::{MinifyType, minify},
        slug::path_segment,
    },
    view::{BlogIndex, CategoryFilter, Directory, HotelView, StatusFilter},
};
use anyhow::{Context, Result};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::{
    fs,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::task;
use walkdir::WalkDir;

/// Stylesheet written to `/style.css` (embedded at compile time)
const STYLESHEET: &str = include_str!("embed/style.css");

/// Snapshot copy published next to the pages.
const DATA_ROUTE: &str = "/data/hotels.json";

/// Load every source, report problems, then render the site.
pub async fn build_all(config: Arc<SiteConfig>) -> Result<()> {
    let data = source::load_site(&config).await;
    data.report();
    task::spawn_blocking(move || build_site(&config, &data))
        .await
        .context("Build task stopped unexpectedly")?
}

// ============================================================================
// Jobs
// ============================================================================

/// One output route and what it renders from.
enum Job<'d> {
    Directory(StatusFilter),
    Hotel(&'d Hotel),
    Blog(&'d CategoryFilter),
    /// Blog index when the post list itself failed to load.
    BlogUnavailable(&'d SiteError),
    Post(&'d str, &'d Result<BlogPost, SiteError>),
    Page(&'d str, &'d Result<StaticPage, SiteError>),
    NotFound,
}

impl Job<'_> {
    /// Progress bar the job counts towards.
    const fn module(&self) -> &'static str {
        match self {
            Self::Directory(_) | Self::Hotel(_) => "hotels",
            Self::Blog(_) | Self::BlogUnavailable(_) | Self::Post(..) => "posts",
            Self::Page(..) | Self::NotFound => "pages",
        }
    }

    /// What the job renders, for warnings.
    fn describe(&self) -> String {
        match self {
            Self::Directory(filter) => format!("directory `{filter}`"),
            Self::Hotel(hotel) => format!("hotel `{}`", hotel.id),
            Self::Blog(category) => format!("category `{category}`"),
            Self::BlogUnavailable(_) => "blog index".to_owned(),
            Self::Post(id, _) => format!("post `{id}`"),
            Self::Page(slug, _) => format!("page `{slug}`"),
            Self::NotFound => "not-found page".to_owned(),
        }
    }

    fn route(&self) -> String {
        match self {
            Self::Directory(StatusFilter::All) => routes::HOME.to_owned(),
            Self::Directory(StatusFilter::Only(status)) => routes::status(*status),
            Self::Hotel(hotel) => routes::hotel(&hotel.id),
            Self::Blog(category) => routes::category(category),
            Self::BlogUnavailable(_) => routes::BLOG.to_owned(),
            Self::Post(id, _) => routes::post(id),
            Self::Page(slug, _) => routes::page(slug),
            Self::NotFound => routes::NOT_FOUND.to_owned(),
        }
    }

    /// Sitemap entry for a successfully rendered route.
    fn sitemap_entry(&self, route: String) -> Option<SitemapEntry> {
        match self {
            Self::Directory(_) | Self::Blog(_) | Self::Page(_, Ok(_)) => {
                Some(SitemapEntry::new(route, None))
            }
            Self::Hotel(hotel) => Some(SitemapEntry::new(route, Some(&hotel.last_updated))),
            Self::Post(_, Ok(post)) => Some(SitemapEntry::new(route, Some(&post.date))),
            _ => None,
        }
    }

    fn render(&self, site: &Site<'_>, route: &str) -> Result<String> {
        let layout = &site.layout;
        match self {
            Self::Directory(filter) => {
                pages::directory(layout, site.directory.as_ref().map_err(|&e| e), "", *filter)
            }
            Self::Hotel(hotel) => pages::hotel(layout, &HotelView::new(hotel)),
            Self::Blog(category) => pages::blog_index(layout, &site.blog, category),
            Self::BlogUnavailable(err) => pages::error_page(layout, route, err, BackTo::Home),
            Self::Post(_, Ok(post)) => pages::post(layout, post),
            Self::Post(_, Err(err)) => pages::error_page(layout, route, err, BackTo::Posts),
            Self::Page(_, Ok(page)) => pages::static_page(layout, page),
            Self::Page(_, Err(err)) => pages::error_page(layout, route, err, BackTo::Home),
            Self::NotFound => pages::not_found(layout),
        }
    }
}

/// Read-only state shared by every render job.
struct Site<'a> {
    layout: Layout<'a>,
    directory: Result<Directory, &'a SiteError>,
    blog: BlogIndex,
}

/// Whether `id` can be written as one output directory unchanged.
fn is_routable(kind: &str, id: &str) -> bool {
    let ok = path_segment(id).as_deref() == Some(id);
    if !ok {
        log!("warn"; "skipping {kind} `{id}`: id is not usable as a path segment");
    }
    ok
}

fn plan<'d>(data: &'d SiteData, site: &'d Site<'_>) -> Vec<Job<'d>> {
    let mut jobs: Vec<Job<'d>> = StatusFilter::ALL.into_iter().map(Job::Directory).collect();

    if let Ok(hotels) = &data.hotels {
        jobs.extend(
            hotels
                .iter()
                .filter(|h| is_routable("hotel", &h.id))
                .map(Job::Hotel),
        );
    }

    match &data.posts {
        Ok(posts) => {
            jobs.extend(site.blog.categories().iter().map(Job::Blog));
            jobs.extend(
                posts
                    .iter()
                    .filter(|(id, _)| is_routable("post", id))
                    .map(|(id, post)| Job::Post(id, post)),
            );
        }
        Err(err) => jobs.push(Job::BlogUnavailable(err)),
    }

    jobs.extend(
        data.pages
            .iter()
            .filter(|(slug, _)| {
                let reserved = routes::is_reserved(slug);
                if reserved {
                    log!("warn"; "skipping page `{slug}`: /{slug}/ is a built-in route");
                }
                !reserved
            })
            .map(|(slug, page)| Job::Page(slug, page)),
    );
    jobs.push(Job::NotFound);
    unique_routes(jobs)
}

/// Keep the first job for each route. Later ones would overwrite its output.
fn unique_routes(jobs: Vec<Job<'_>>) -> Vec<Job<'_>> {
    let mut seen = FxHashSet::default();
    jobs.into_iter()
        .filter(|job| {
            let route = job.route();
            if seen.contains(&route) {
                log!("warn"; "skipping {}: {route} is already rendered", job.describe());
                false
            } else {
                seen.insert(route);
                true
            }
        })
        .collect()
}

// ============================================================================
// Build
// ============================================================================

/// Render the whole site from already-loaded data.
///
/// If `config.build.clean` is true, clears the entire output directory first.
pub fn build_site(config: &SiteConfig, data: &SiteData) -> Result<()> {
    let paths = config.paths();
    prepare_output(paths.output_dir(), config.build.clean)?;

    let loaded_pages = data.pages.iter().filter_map(|(_, page)| page.as_ref().ok());
    let site = Site {
        layout: Layout::new(&config.base, loaded_pages),
        directory: data.hotels.as_ref().map(|h| Directory::new(h.clone())),
        blog: BlogIndex::new(data.loaded_posts()),
    };

    let jobs = plan(data, &site);
    let counts = ["hotels", "posts", "pages"]
        .map(|module| (module, jobs.iter().filter(|j| j.module() == module).count()));
    let progress = ProgressBars::new_filtered(&counts);
    let failed = AtomicUsize::new(0);

    let entries = jobs
        .par_iter()
        .map(|job| -> Result<Option<SitemapEntry>> {
            let route = job.route();
            let html = job.render(&site, &route)?;
            write_page(&paths, &route, &html, config.build.minify)?;

            if let Some(progress) = &progress {
                progress.inc(job.module());
            }
            let entry = job.sitemap_entry(route);
            if entry.is_none() && !matches!(job, Job::NotFound) {
                failed.fetch_add(1, Ordering::Relaxed);
            }
            Ok(entry)
        })
        .collect::<Result<Vec<_>>>();

    if let Some(progress) = &progress {
        progress.finish();
    }
    let entries: Vec<SitemapEntry> = entries?.into_iter().flatten().collect();

    write_file(&paths, routes::STYLESHEET, STYLESHEET.as_bytes())?;
    if let Ok(hotels) = &data.hotels {
        write_snapshot(&paths, hotels, config.build.minify)?;
    }
    let assets = copy_assets(&config.build.assets, paths.output_dir())?;

    build_sitemap(config, &entries)?;
    build_rss(config, site.blog.posts())?;

    log!(
        "build";
        "{} pages, {} error pages, {} assets",
        jobs.len(),
        failed.load(Ordering::Relaxed),
        assets
    );
    Ok(())
}

/// Create the output directory, emptying it first when `clean` is set.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

// ============================================================================
// Writers
// ============================================================================

fn write_page(paths: &PathResolver<'_>, route: &str, html: &str, minify_html: bool) -> Result<()> {
    let html = minify(MinifyType::Html, html.as_bytes(), minify_html);
    write_file(paths, route, &html)
}

/// Write `content` to the file behind `route`, creating parent directories.
fn write_file(paths: &PathResolver<'_>, route: &str, content: &[u8]) -> Result<()> {
    let route = urlencoding::decode(route).with_context(|| format!("Invalid route {route}"))?;
    let path = paths.file_for_url(&route);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn write_snapshot(paths: &PathResolver<'_>, hotels: &[Hotel], compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_vec(hotels)?
    } else {
        serde_json::to_vec_pretty(hotels)?
    };
    write_file(paths, DATA_ROUTE, &json)
}

/// Copy the asset tree verbatim. Hidden files are skipped.
///
/// Returns the number of files copied; a missing assets directory copies nothing.
fn copy_assets(assets: &Path, output: &Path) -> Result<usize> {
    if !assets.is_dir() {
        return Ok(0);
    }

    let files: Vec<_> = WalkDir::new(assets)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect();

    files.par_iter().try_for_each(|path| {
        let rel = path.strip_prefix(assets)?;
        let dest = output.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)
            .with_context(|| format!("Failed to copy asset {}", path.display()))?;
        Ok::<_, anyhow::Error>(())
    })?;

    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Status, test_hotel};
    use tempfile::TempDir;

    fn config(dir: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.output = dir.join("public");
        config.build.assets = dir.join("assets");
        config.build.minify = false;
        config
    }

    fn post(id: &str, category: &str) -> BlogPost {
        BlogPost {
            id: id.into(),
            title: format!("Post {id}"),
            author: "Ann".into(),
            date: "2024-07-01".into(),
            category: category.into(),
            excerpt: "x".into(),
            image: "/x.png".into(),
            content: Some("Body".into()),
        }
    }

    fn page(slug: &str) -> StaticPage {
        StaticPage {
            slug: slug.into(),
            title: "About".into(),
            description: None,
            body: "We track pests.".into(),
        }
    }

    fn data() -> SiteData {
        SiteData {
            hotels: Ok(vec![
                test_hotel("a", Status::Clean, "2024-07-01"),
                test_hotel("b", Status::PestReported, "2024-07-15"),
            ]),
            posts: Ok(vec![
                ("hello".into(), Ok(post("hello", "Travel Tips"))),
                ("broken".into(), Err(SiteError::Validation("missing title".into()))),
            ]),
            pages: vec![("about".into(), Ok(page("about")))],
        }
    }

    fn read(dir: &Path, rel: &str) -> String {
        fs::read_to_string(dir.join("public").join(rel)).unwrap()
    }

    #[test]
    fn test_build_writes_every_route() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        build_site(&config, &data()).unwrap();

        for rel in [
            "index.html",
            "status/clean/index.html",
            "status/pest-reported/index.html",
            "hotel/a/index.html",
            "hotel/b/index.html",
            "blog/index.html",
            "blog/category/travel-tips/index.html",
            "blog/hello/index.html",
            "blog/broken/index.html",
            "about/index.html",
            "404.html",
            "style.css",
            "data/hotels.json",
            "sitemap.xml",
        ] {
            assert!(dir.path().join("public").join(rel).is_file(), "missing {rel}");
        }
        assert!(!dir.path().join("public/feed.xml").exists());
    }

    #[test]
    fn test_failed_post_renders_error_page() {
        let dir = TempDir::new().unwrap();
        build_site(&config(dir.path()), &data()).unwrap();

        let html = read(dir.path(), "blog/broken/index.html");
        assert!(html.contains("This page could not be displayed."));
        assert!(html.contains("← Back to all posts"));

        let sitemap = read(dir.path(), "sitemap.xml");
        assert!(sitemap.contains("/blog/hello/"));
        assert!(!sitemap.contains("/blog/broken/"));
    }

    #[test]
    fn test_failed_hotels_render_directory_error_state() {
        let dir = TempDir::new().unwrap();
        let mut data = data();
        data.hotels = Err(SiteError::fetch("data/hotels.json", "No such file"));
        build_site(&config(dir.path()), &data).unwrap();

        assert!(read(dir.path(), "index.html").contains("Could not load data."));
        assert!(!dir.path().join("public/hotel").exists());
        assert!(!dir.path().join("public/data/hotels.json").exists());
    }

    #[test]
    fn test_failed_post_list_renders_blog_error() {
        let dir = TempDir::new().unwrap();
        let mut data = data();
        data.posts = Err(SiteError::fetch("posts", "not a directory"));
        build_site(&config(dir.path()), &data).unwrap();

        let html = read(dir.path(), "blog/index.html");
        assert!(html.contains("Could not load data."));
    }

    #[test]
    fn test_unroutable_ids_are_skipped() {
        let dir = TempDir::new().unwrap();
        let mut data = data();
        if let Ok(hotels) = &mut data.hotels {
            hotels.push(test_hotel("../escape", Status::Clean, "2024-01-01"));
        }
        build_site(&config(dir.path()), &data).unwrap();

        assert!(!dir.path().join("escape").exists());
        assert!(!dir.path().join("public/escape").exists());
    }

    #[test]
    fn test_colliding_category_slugs_render_once() {
        let dir = TempDir::new().unwrap();
        let mut data = data();
        data.posts = Ok(vec![
            ("one".into(), Ok(post("one", "Travel Tips"))),
            ("two".into(), Ok(post("two", "travel tips"))),
        ]);
        build_site(&config(dir.path()), &data).unwrap();

        // First category in listing order keeps the shared route
        let html = read(dir.path(), "blog/category/travel-tips/index.html");
        assert!(html.contains("Post one"));
        assert!(!html.contains("Post two"));
        let sitemap = read(dir.path(), "sitemap.xml");
        assert_eq!(sitemap.matches("/blog/category/travel-tips/").count(), 1);
    }

    #[test]
    fn test_page_cannot_replace_builtin_route() {
        let dir = TempDir::new().unwrap();
        let mut data = data();
        let mut blog = page("blog");
        blog.title = "Shadow Blog".into();
        data.pages.push(("blog".into(), Ok(blog)));
        data.pages.push(("hotel".into(), Ok(page("hotel"))));
        build_site(&config(dir.path()), &data).unwrap();

        let html = read(dir.path(), "blog/index.html");
        assert!(html.contains("Post hello"));
        assert!(!html.contains("Shadow Blog"));
        assert!(!dir.path().join("public/hotel/index.html").exists());
        assert!(read(dir.path(), "about/index.html").contains("We track pests."));
    }

    #[test]
    fn test_duplicate_hotel_ids_render_once() {
        let mut data = data();
        if let Ok(hotels) = &mut data.hotels {
            let mut twin = test_hotel("a", Status::PestReported, "2024-08-01");
            twin.name = "Twin".into();
            hotels.push(twin);
        }
        let config = SiteConfig::default();
        let err = SiteError::not_found("hotel", "x");
        let site = Site {
            layout: Layout::new(&config.base, []),
            directory: Err(&err),
            blog: BlogIndex::default(),
        };

        let jobs = plan(&data, &site);
        let routes: Vec<_> = jobs.iter().map(Job::route).collect();
        let unique: FxHashSet<_> = routes.iter().collect();
        assert_eq!(routes.len(), unique.len());
        let kept = jobs.iter().find_map(|job| match job {
            Job::Hotel(hotel) if hotel.id == "a" => Some(hotel.name.as_str()),
            _ => None,
        });
        assert_eq!(kept, Some("Hotel a"));
    }

    #[test]
    fn test_status_pages_carry_every_hotel() {
        let dir = TempDir::new().unwrap();
        build_site(&config(dir.path()), &data()).unwrap();

        let html = read(dir.path(), "status/clean/index.html");
        assert!(html.contains(r#"href="/hotel/a/""#));
        assert!(html.contains(r#"href="/hotel/b/""#));
        assert!(html.contains(r#"data-status="pest-reported" hidden="hidden""#));
        assert!(html.contains(r#"<option value="all">"#));
    }

    #[test]
    fn test_snapshot_copy_round_trips() {
        let dir = TempDir::new().unwrap();
        build_site(&config(dir.path()), &data()).unwrap();

        let hotels: Vec<Hotel> = serde_json::from_str(&read(dir.path(), "data/hotels.json")).unwrap();
        assert_eq!(hotels.len(), 2);
        assert_eq!(hotels[1].status, Status::PestReported);
    }

    #[test]
    fn test_copy_assets_skips_hidden() {
        let dir = TempDir::new().unwrap();
        let assets = dir.path().join("assets");
        fs::create_dir_all(assets.join("img")).unwrap();
        fs::write(assets.join("img/logo.png"), b"png").unwrap();
        fs::write(assets.join(".DS_Store"), b"junk").unwrap();

        build_site(&config(dir.path()), &data()).unwrap();

        assert_eq!(read(dir.path(), "img/logo.png"), "png");
        assert!(!dir.path().join("public/.DS_Store").exists());
    }

    #[test]
    fn test_clean_removes_stale_output() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        fs::create_dir_all(&config.build.output).unwrap();
        fs::write(config.build.output.join("stale.html"), "old").unwrap();

        build_site(&config, &data()).unwrap();
        assert!(config.build.output.join("stale.html").exists());

        config.build.clean = true;
        build_site(&config, &data()).unwrap();
        assert!(!config.build.output.join("stale.html").exists());
    }

    #[tokio::test]
    async fn test_build_all_loads_sources() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        config.build.data.hotels = dir.path().join("hotels.json");
        config.build.blog.posts = dir.path().join("posts");
        config.build.pages = dir.path().join("pages");
        fs::write(
            &config.build.data.hotels,
            r#"[{"id":"sunrise","name":"Sunrise Inn","city":"Delhi","status":"Clean","lastUpdated":"2024-07-10"}]"#,
        )
        .unwrap();

        build_all(Arc::new(config)).await.unwrap();

        assert!(read(dir.path(), "hotel/sunrise/index.html").contains("Sunrise Inn"));
        // Missing posts directory renders the blog in its error state.
        assert!(read(dir.path(), "blog/index.html").contains("Could not load data."));
    }
}
