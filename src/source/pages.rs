//! Static pages from `<pages>/<slug>.md`.

use crate::content::parse_page;
use crate::error::SiteError;
use crate::model::StaticPage;
use crate::utils::slug::path_segment;
use std::{fs, path::Path};
use walkdir::WalkDir;

/// Load every page in `dir`, sorted by slug.
///
/// A missing directory yields no pages. Each page fails on its own.
pub fn load_pages(dir: &Path) -> Vec<(String, Result<StaticPage, SiteError>)> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut pages: Vec<_> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .filter_map(|e| {
            let stem = e.path().file_stem()?.to_str()?;
            let slug = path_segment(stem)?;
            Some((slug, e.into_path()))
        })
        .map(|(slug, path)| {
            let page = load_page(&slug, &path);
            (slug, page)
        })
        .collect();
    pages.sort_by(|a, b| a.0.cmp(&b.0));
    pages
}

fn load_page(slug: &str, path: &Path) -> Result<StaticPage, SiteError> {
    let raw = fs::read_to_string(path)
        .map_err(|err| SiteError::fetch(path.display().to_string(), err))?;
    Ok(parse_page(slug, &raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_pages() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("report.md"),
            "---\ntitle: Report an Incident\n---\nTell us.",
        )
        .unwrap();
        fs::write(
            dir.path().join("about.md"),
            "---\ntitle: About\ndescription: Who we are\n---\nA community project.",
        )
        .unwrap();
        fs::write(dir.path().join("broken.md"), "no header").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip").unwrap();

        let pages = load_pages(dir.path());
        let slugs: Vec<_> = pages.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(slugs, ["about", "broken", "report"]);

        let about = pages[0].1.as_ref().unwrap();
        assert_eq!(about.title, "About");
        assert_eq!(about.description.as_deref(), Some("Who we are"));
        assert!(matches!(pages[1].1, Err(SiteError::Format(_))));
        assert_eq!(pages[2].1.as_ref().unwrap().body, "Tell us.");
    }

    #[test]
    fn test_missing_dir_is_empty() {
        assert!(load_pages(Path::new("/no/such/pages")).is_empty());
    }
}
