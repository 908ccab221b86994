//! `search` and `preview`: read-only commands over the loaded data.
//!
//! Neither writes back to a data source. `preview --save` writes only the
//! rendered page.

use crate::{
    config::SiteConfig,
    error::SiteError,
    log,
    model::{Hotel, UserReview},
    render::{Layout, pages, pages::BackTo, routes},
    source::{fetch_hotels, load_pages},
    utils::minify::{MinifyType, minify},
    view::{DirectoryView, HotelView, StatusFilter, derive, is_landing, parse_edit},
};
use anyhow::{Context, Result};
use std::{fmt::Write as _, fs, path::Path};

// ============================================================================
// Search
// ============================================================================

/// Print the directory view for `query` and `filter`, as a table or JSON.
pub async fn search(config: &SiteConfig, query: &str, filter: StatusFilter, json: bool) -> Result<()> {
    let hotels = fetch_hotels(&config.build.data.hotels).await?;
    let view = derive(&hotels, query, filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", format_view(&view, is_landing(query, filter)));
    }
    Ok(())
}

/// Plain-text rendering of a view. Curated lists only on the landing view.
fn format_view(view: &DirectoryView, landing: bool) -> String {
    let mut out = String::new();

    if landing {
        format_section(&mut out, "Top Clean Hotels", &view.top_clean);
        format_section(&mut out, "Recently Reported", &view.recently_reported);
    }

    if view.filtered.is_empty() {
        out.push_str("No hotels found matching your criteria.\n");
    } else {
        let heading = if landing { "All Hotels" } else { "Results" };
        format_section(&mut out, heading, &view.filtered);
    }
    out
}

fn format_section(out: &mut String, heading: &str, hotels: &[Hotel]) {
    if hotels.is_empty() {
        return;
    }
    let _ = writeln!(out, "{heading} ({})", hotels.len());
    for hotel in hotels {
        let _ = writeln!(
            out,
            "  {} {:<24} {:<14} {:<14} {}  {}",
            hotel.status.badge(),
            hotel.name,
            hotel.city,
            hotel.status.label(),
            hotel.last_updated,
            hotel.id,
        );
    }
    out.push('\n');
}

// ============================================================================
// Preview
// ============================================================================

/// Local edits and reviews for one preview, in CLI form.
#[derive(Debug)]
pub struct PreviewArgs<'a> {
    pub id: &'a str,
    /// `FIELD=VALUE`
    pub edits: &'a [String],
    /// `RATING|AUTHOR|COMMENT`
    pub reviews: &'a [String],
}

/// Render one hotel page with local edits and reviews applied.
///
/// Writes to `save`, or stdout. An unknown id renders the not-found page.
pub async fn preview(config: &SiteConfig, args: PreviewArgs<'_>, save: Option<&Path>) -> Result<()> {
    let hotels = fetch_hotels(&config.build.data.hotels).await?;
    let pages = load_pages(&config.build.pages);
    let layout = Layout::new(&config.base, pages.iter().filter_map(|(_, p)| p.as_ref().ok()));

    let html = render_preview(&layout, &hotels, &args)?;
    let html = minify(MinifyType::Html, html.as_bytes(), config.build.minify);

    match save {
        Some(path) => {
            fs::write(path, &*html).with_context(|| format!("Failed to write {}", path.display()))?;
            log!("preview"; "wrote {}", path.display());
        }
        None => println!("{}", String::from_utf8_lossy(&html)),
    }
    Ok(())
}

fn render_preview(layout: &Layout<'_>, hotels: &[Hotel], args: &PreviewArgs<'_>) -> Result<String> {
    let Some(hotel) = hotels.iter().find(|h| h.id == args.id) else {
        let err = SiteError::not_found("hotel", args.id);
        log!("error"; "{err}");
        return pages::error_page(layout, &routes::hotel(args.id), &err, BackTo::Hotels);
    };

    let mut view = HotelView::new(hotel);
    if !args.edits.is_empty() {
        view.begin_edit();
        for spec in args.edits {
            let (field, value) = parse_edit(spec)?;
            view.set(field, value)?;
        }
        view.save()?;
    }
    for spec in args.reviews {
        let (rating, author, comment) = UserReview::split_cli(spec)?;
        view.add_review(rating, author, comment)?;
    }

    pages::hotel(layout, &view)
}
