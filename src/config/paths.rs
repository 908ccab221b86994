//! Mapping between site URL paths and output files.
//!
//! ```text
//! /                    → public/index.html
//! /hotel/grand-plaza/  → public/hotel/grand-plaza/index.html
//! /404.html            → public/404.html
//! /data/hotels.json    → public/data/hotels.json
//! ```

use std::path::{Path, PathBuf};

/// Resolves URL paths against the output directory.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    output: &'a Path,
}

impl<'a> PathResolver<'a> {
    #[inline]
    pub const fn new(output: &'a Path) -> Self {
        Self { output }
    }

    #[inline]
    pub const fn output_dir(&self) -> &'a Path {
        self.output
    }

    /// Output file for a URL path.
    ///
    /// Paths ending in `/` are directories served through `index.html`.
    pub fn file_for_url(&self, url_path: &str) -> PathBuf {
        let rel = url_path.trim_start_matches('/');
        if rel.is_empty() {
            self.output.join("index.html")
        } else if rel.ends_with('/') {
            self.output.join(rel).join("index.html")
        } else {
            self.output.join(rel)
        }
    }
}
