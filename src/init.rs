//! Site initialization module.
//!
//! Creates a starter site: config, a hotel snapshot, three posts and the
//! about/report pages.

use crate::config::SiteConfig;
use crate::source::BUNDLED_POSTS;
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore", ".ignore"];

/// Starter content, relative to the site root (embedded at compile time).
/// Posts come from [`BUNDLED_POSTS`] and land in `posts/`.
const SITE_FILES: &[(&str, &str)] = &[
    ("data/hotels.json", include_str!("embed/init/data/hotels.json")),
    ("pages/about.md", include_str!("embed/init/pages/about.md")),
    ("pages/report.md", include_str!("embed/init/pages/report.md")),
];

const DEFAULT_CONFIG: &str = include_str!("embed/init/bedbug.toml");

/// Empty directories created alongside the starter content
const SITE_DIRS: &[&str] = &["assets"];

/// Create a new site at the configured root.
///
/// Without a name (init in the current directory), the directory must be empty.
pub fn new_site(config: &SiteConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();

    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `bedbug init <SITE_NAME>` to create in a subdirectory."
        );
    }

    init_site_structure(root)?;
    write_file(&config.config_path, DEFAULT_CONFIG)?;
    init_ignored_files(root, &[Path::new("/public/")])?;

    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Write the starter files, refusing to overwrite anything.
fn init_site_structure(root: &Path) -> Result<()> {
    let posts = BUNDLED_POSTS.iter().map(|(name, content)| (format!("posts/{name}"), *content));
    let files: Vec<(String, &str)> = SITE_FILES
        .iter()
        .map(|(rel, content)| ((*rel).to_owned(), *content))
        .chain(posts)
        .collect();

    for (rel, _) in &files {
        let path = root.join(rel);
        if path.exists() {
            bail!(
                "Path `{}` already exists. Try `bedbug init <SITE_NAME>` instead.",
                path.display()
            );
        }
    }

    for dir in SITE_DIRS {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    for (rel, content) in &files {
        write_file(&root.join(rel), content)?;
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Initialize .gitignore and .ignore files with specified paths
fn init_ignored_files(root: &Path, paths: &[&Path]) -> Result<()> {
    let content = paths
        .iter()
        .filter_map(|p| p.to_str())
        .collect::<Vec<_>>()
        .join("\n");

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        if !path.exists() {
            fs::write(&path, &content)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        content::{parse_page, parse_post},
        source::parse_hotels,
    };
    use tempfile::TempDir;

    fn config_at(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.set_root(root);
        config.config_path = root.join("bedbug.toml");
        config
    }

    #[test]
    fn test_new_site_writes_starter_content() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("site");
        new_site(&config_at(&root), true).unwrap();

        let config = SiteConfig::from_path(&root.join("bedbug.toml")).unwrap();
        assert_eq!(config.base.title, "BedBug Tracker");
        assert!(root.join("assets").is_dir());
        assert_eq!(fs::read_to_string(root.join(".gitignore")).unwrap(), "/public/");

        let json = fs::read_to_string(root.join("data/hotels.json")).unwrap();
        let hotels = parse_hotels(&json, Path::new("data/hotels.json")).unwrap();
        assert_eq!(hotels.len(), 8);
    }

    #[test]
    fn test_starter_posts_and_pages_parse() {
        for (name, content) in BUNDLED_POSTS {
            let post = parse_post(content).unwrap();
            assert_eq!(Some(post.id.as_str()), name.strip_suffix(".md"));
        }
        for (rel, content) in SITE_FILES {
            if let Some(slug) = rel.strip_prefix("pages/").and_then(|r| r.strip_suffix(".md")) {
                parse_page(slug, content).unwrap();
            }
        }
    }

    #[test]
    fn test_new_site_writes_bundled_posts() {
        let dir = TempDir::new().unwrap();
        new_site(&config_at(dir.path()), true).unwrap();
        for (name, content) in BUNDLED_POSTS {
            assert_eq!(fs::read_to_string(dir.path().join("posts").join(name)).unwrap(), *content);
        }
    }

    #[test]
    fn test_new_site_requires_empty_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "mine").unwrap();

        let err = new_site(&config_at(dir.path()), false).unwrap_err();
        assert!(err.to_string().contains("not empty"));
    }

    #[test]
    fn test_new_site_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("pages/about.md"), "mine").unwrap();

        let err = new_site(&config_at(dir.path()), true).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(dir.path().join("pages/about.md")).unwrap(), "mine");
    }
}
