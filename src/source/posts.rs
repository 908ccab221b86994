//! Blog post sources.
//!
//! Pages depend only on [`PostSource`]; which storage layout backs it is a
//! configuration choice.
//!
//! | Strategy                 | Layout                                        |
//! |--------------------------|-----------------------------------------------|
//! | [`FrontMatterDirSource`] | `<posts>/<id>.md` with a full header          |
//! | [`ManifestPostSource`]   | JSON metadata array + `<posts>/<id>.md` body  |
//! | [`JsonPostSource`]       | one JSON array of complete posts              |
//! | [`StaticPostSource`]     | in-memory collection (the bundled samples)    |

use crate::config::{BlogConfig, PostSourceKind};
use crate::content::{FrontMatter, FrontMatterError, parse_post};
use crate::error::SiteError;
use crate::model::BlogPost;
use crate::utils::slug::path_segment;
use parking_lot::RwLock;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};
use walkdir::WalkDir;

/// Extension of post body files.
const POST_EXT: &str = "md";

/// Sample posts compiled into the binary, keyed by file name.
pub const BUNDLED_POSTS: &[(&str, &str)] = &[
    (
        "travel-safe-pest-prevention-tips.md",
        include_str!("../embed/init/posts/travel-safe-pest-prevention-tips.md"),
    ),
    (
        "understanding-hotel-cleanliness-ratings.md",
        include_str!("../embed/init/posts/understanding-hotel-cleanliness-ratings.md"),
    ),
    (
        "community-power-the-story-of-bedbug-tracker.md",
        include_str!("../embed/init/posts/community-power-the-story-of-bedbug-tracker.md"),
    ),
];

/// Load a post by id from some backing store.
pub trait PostSource: Send + Sync {
    /// Every known post id, in storage order.
    fn ids(&self) -> Result<Vec<String>, SiteError>;

    /// The post with `id`, body included.
    ///
    /// Absence is [`SiteError::NotFound`], distinct from read or parse failures.
    fn get_post_by_id(&self, id: &str) -> Result<BlogPost, SiteError>;
}

/// Build the source selected by `[build.blog]`.
pub fn from_config(blog: &BlogConfig) -> Box<dyn PostSource> {
    match blog.source {
        PostSourceKind::Frontmatter => Box::new(FrontMatterDirSource::new(&blog.posts)),
        PostSourceKind::Manifest => Box::new(ManifestPostSource::new(&blog.manifest, &blog.posts)),
        PostSourceKind::Json => Box::new(JsonPostSource::new(&blog.json)),
        PostSourceKind::Static => Box::new(StaticPostSource::bundled()),
    }
}

fn not_found(id: &str) -> SiteError {
    SiteError::not_found("post", id)
}

fn read_text(path: &Path, id: &str) -> Result<String, SiteError> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => not_found(id),
        _ => SiteError::fetch(path.display().to_string(), err),
    })
}

/// File holding the body of `id`, if `id` is a safe file name.
fn post_file(dir: &Path, id: &str) -> Result<PathBuf, SiteError> {
    match path_segment(id) {
        Some(segment) if segment == id => Ok(dir.join(format!("{id}.{POST_EXT}"))),
        _ => Err(not_found(id)),
    }
}

// ============================================================================
// Cached JSON Collections
// ============================================================================

/// Lazily decoded JSON array, cached after the first successful read.
struct JsonCollection {
    path: PathBuf,
    cache: RwLock<Option<Arc<Vec<BlogPost>>>>,
}

impl JsonCollection {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            cache: RwLock::new(None),
        }
    }

    fn load(&self) -> Result<Arc<Vec<BlogPost>>, SiteError> {
        // Fast path: read lock only
        if let Some(posts) = self.cache.read().as_ref() {
            return Ok(Arc::clone(posts));
        }

        let mut cache = self.cache.write();
        if let Some(posts) = cache.as_ref() {
            return Ok(Arc::clone(posts));
        }

        let what = self.path.display().to_string();
        let json = fs::read_to_string(&self.path).map_err(|err| SiteError::fetch(&what, err))?;
        let posts: Vec<BlogPost> =
            serde_json::from_str(&json).map_err(|err| SiteError::fetch(&what, err))?;
        Ok(Arc::clone(cache.insert(Arc::new(posts))))
    }

    fn ids(&self) -> Result<Vec<String>, SiteError> {
        Ok(self.load()?.iter().map(|p| p.id.clone()).collect())
    }

    fn find(&self, id: &str) -> Result<BlogPost, SiteError> {
        self.load()?
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// Posts held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticPostSource {
    posts: Vec<BlogPost>,
}

impl StaticPostSource {
    pub fn new(posts: Vec<BlogPost>) -> Self {
        Self { posts }
    }

    /// The [`BUNDLED_POSTS`] samples.
    pub fn bundled() -> Self {
        let posts = BUNDLED_POSTS
            .iter()
            .filter_map(|(_, raw)| parse_post(raw).ok())
            .collect();
        Self::new(posts)
    }
}

impl PostSource for StaticPostSource {
    fn ids(&self) -> Result<Vec<String>, SiteError> {
        Ok(self.posts.iter().map(|p| p.id.clone()).collect())
    }

    fn get_post_by_id(&self, id: &str) -> Result<BlogPost, SiteError> {
        self.posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }
}

/// One JSON array of complete posts.
pub struct JsonPostSource {
    posts: JsonCollection,
}

impl JsonPostSource {
    pub fn new(path: &Path) -> Self {
        Self {
            posts: JsonCollection::new(path),
        }
    }
}

impl PostSource for JsonPostSource {
    fn ids(&self) -> Result<Vec<String>, SiteError> {
        self.posts.ids()
    }

    fn get_post_by_id(&self, id: &str) -> Result<BlogPost, SiteError> {
        self.posts.find(id)
    }
}

/// Metadata from a manifest array, body from `<dir>/<id>.md`.
///
/// Body files may carry their own header:
/// - a complete header wins over the manifest entry (id excepted);
/// - an incomplete header is dropped, keeping its body;
/// - no header at all means the whole file is the body.
pub struct ManifestPostSource {
    manifest: JsonCollection,
    dir: PathBuf,
}

impl ManifestPostSource {
    pub fn new(manifest: &Path, dir: &Path) -> Self {
        Self {
            manifest: JsonCollection::new(manifest),
            dir: dir.to_path_buf(),
        }
    }
}

impl PostSource for ManifestPostSource {
    fn ids(&self) -> Result<Vec<String>, SiteError> {
        self.manifest.ids()
    }

    fn get_post_by_id(&self, id: &str) -> Result<BlogPost, SiteError> {
        let meta = self.manifest.find(id)?;
        let path = post_file(&self.dir, id)?;
        let raw = fs::read_to_string(&path)
            .map_err(|err| SiteError::fetch(path.display().to_string(), err))?;

        let body = match parse_post(&raw) {
            Ok(post) => {
                return Ok(BlogPost {
                    id: meta.id,
                    ..post
                });
            }
            Err(FrontMatterError::Validation(_)) => FrontMatter::parse(&raw)?.body().to_owned(),
            Err(FrontMatterError::Format) => raw.trim().to_owned(),
        };

        Ok(BlogPost {
            content: Some(body),
            ..meta
        })
    }
}

/// A directory of `<id>.md` files with complete headers.
///
/// The declared `id` must equal the file stem.
pub struct FrontMatterDirSource {
    dir: PathBuf,
}

impl FrontMatterDirSource {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }
}

impl PostSource for FrontMatterDirSource {
    fn ids(&self) -> Result<Vec<String>, SiteError> {
        if !self.dir.is_dir() {
            return Err(SiteError::fetch(
                self.dir.display().to_string(),
                "not a directory",
            ));
        }

        let mut ids: Vec<String> = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == POST_EXT))
            .filter_map(|e| e.path().file_stem()?.to_str().map(str::to_owned))
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn get_post_by_id(&self, id: &str) -> Result<BlogPost, SiteError> {
        let path = post_file(&self.dir, id)?;
        let post = parse_post(&read_text(&path, id)?)?;
        if post.id != id {
            return Err(SiteError::Validation(format!(
                "declared id `{}` does not match file name `{id}.{POST_EXT}`",
                post.id
            )));
        }
        Ok(post)
    }
}
