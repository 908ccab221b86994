//! Classify changed paths for watch mode.
//!
//! | Category | Reaction                                   |
//! |----------|--------------------------------------------|
//! | Config   | reload `bedbug.toml`, full rebuild          |
//! | Data     | full rebuild, reload the live snapshot      |
//! | Posts    | full rebuild                                |
//! | Pages    | full rebuild                                |
//! | Assets   | full rebuild                                |
//! | Unknown  | ignored                                     |

use crate::config::SiteConfig;
use std::{
    env,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Config,
    Data,
    Posts,
    Pages,
    Assets,
    Unknown,
}

impl FileCategory {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Data => "data",
            Self::Posts => "posts",
            Self::Pages => "pages",
            Self::Assets => "assets",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the server's hotel snapshot must be reloaded afterwards.
    pub const fn reloads_snapshot(self) -> bool {
        matches!(self, Self::Config | Self::Data)
    }
}

/// Paths to register with the watcher: every existing source location.
pub fn watched_paths(config: &SiteConfig) -> Vec<PathBuf> {
    let build = &config.build;
    let blog = &build.blog;
    [
        &config.config_path,
        &build.data.hotels,
        &blog.posts,
        &blog.manifest,
        &blog.json,
        &build.pages,
        &build.assets,
    ]
    .into_iter()
    .filter(|p| p.exists())
    .cloned()
    .collect()
}

pub fn categorize_path(path: &Path, config: &SiteConfig) -> FileCategory {
    let path = normalize_path(path);
    let build = &config.build;

    if path == config.config_path {
        FileCategory::Config
    } else if path == build.data.hotels {
        FileCategory::Data
    } else if path == build.blog.manifest
        || path == build.blog.json
        || path.starts_with(&build.blog.posts)
    {
        FileCategory::Posts
    } else if path.starts_with(&build.pages) {
        FileCategory::Pages
    } else if path.starts_with(&build.assets) {
        FileCategory::Assets
    } else {
        FileCategory::Unknown
    }
}

/// Absolute form of `path`, canonical when it exists.
///
/// Config paths are canonicalized at load, so watcher paths must be too.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}
