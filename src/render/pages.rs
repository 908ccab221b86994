//! Page renderers. Each renders inside its own head scope.

use super::head::Head;
use super::layout::Layout;
use super::{jsonld, routes};
use crate::content::markdown;
use crate::error::SiteError;
use crate::model::{BlogPost, Hotel, Report, StaticPage, Status, UserReview};
use crate::utils::date;
use crate::utils::html::{self, HtmlWriter};
use crate::view::{BlogIndex, CategoryFilter, Directory, HotelView, StatusFilter, is_landing};
use anyhow::Result;

const DIRECTORY_DESCRIPTION: &str =
    "Search our directory for user-contributed pest reports before you book your next hotel stay.";
const BLOG_DESCRIPTION: &str =
    "Read our latest articles on travel safety, pest prevention tips, and community news.";

/// Filters the rendered cards in place; the full list is already in the page.
const DIRECTORY_FILTER: &str = "(function(){var f=document.getElementById('hotel-search');\
if(!f)return;var q=f.elements.q,s=f.elements.status;\
function run(){var n=q.value.toLowerCase(),v=s.value,shown=0;\
document.querySelectorAll('#all-hotels .hotel-card').forEach(function(c){\
var ok=(v==='all'||c.dataset.status===v)&&(n===''||c.dataset.name.indexOf(n)>=0||c.dataset.city.indexOf(n)>=0);\
c.hidden=!ok;if(ok)shown++;});\
document.querySelectorAll('.featured').forEach(function(e){e.hidden=!(n===''&&v==='all');});\
var empty=document.getElementById('no-results');if(empty)empty.hidden=shown>0;}\
f.addEventListener('submit',function(e){e.preventDefault();run();});\
q.addEventListener('input',run);s.addEventListener('change',run);})();";

/// Where an error page sends the visitor back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackTo {
    Hotels,
    Posts,
    Home,
}

impl BackTo {
    fn href(self) -> &'static str {
        match self {
            Self::Hotels | Self::Home => routes::HOME,
            Self::Posts => routes::BLOG,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Hotels => "← Back to all hotels",
            Self::Posts => "← Back to all posts",
            Self::Home => "← Back to the home page",
        }
    }
}

fn write_back_link(w: &mut HtmlWriter, back: BackTo) -> Result<()> {
    html::write_start(w, "p", &[("class", "back")])?;
    html::write_link(w, back.href(), "", back.label())?;
    html::write_end(w, "p")
}

// ============================================================================
// Hotel Directory
// ============================================================================

/// Home page (`filter` = all) or a per-status listing.
///
/// A failed snapshot load renders the page in its error state.
pub fn directory(
    layout: &Layout<'_>,
    hotels: Result<&Directory, &SiteError>,
    query: &str,
    filter: StatusFilter,
) -> Result<String> {
    let (route, title) = match filter {
        StatusFilter::All => (routes::HOME.to_owned(), "Hotel Directory".to_owned()),
        StatusFilter::Only(status) => (routes::status(status), format!("{} Hotels", status.label())),
    };

    let mut doc = layout.document();
    let doc = doc.scope(
        Head::titled(title)
            .description(DIRECTORY_DESCRIPTION)
            .canonical(layout.canonical(&route)),
    );

    layout.render(&doc, &route, |w| {
        html::write_start(w, "section", &[("class", "hero")])?;
        html::write_text_element(w, "h1", &[], "Travel Confidently.")?;
        html::write_text_element(
            w,
            "p",
            &[],
            "Check our community-sourced directory for pest reports before you book.",
        )?;
        html::write_end(w, "section")?;

        write_search_form(w, query, filter)?;

        match hotels {
            Ok(directory) => write_directory(w, directory, query, filter)?,
            Err(err) => write_error_notice(w, err)?,
        }
        html::write_inline_script(w, None, DIRECTORY_FILTER)
    })
}

fn write_search_form(w: &mut HtmlWriter, query: &str, filter: StatusFilter) -> Result<()> {
    html::write_start(
        w,
        "form",
        &[("id", "hotel-search"), ("class", "search"), ("action", routes::HOME)],
    )?;
    html::write_text_element(w, "label", &[("for", "q")], "Search by Hotel or City")?;
    html::write_empty(
        w,
        "input",
        &[
            ("type", "text"),
            ("id", "q"),
            ("name", "q"),
            ("value", query),
            ("placeholder", "e.g., Grand Plaza or New York"),
        ],
    )?;

    html::write_text_element(w, "label", &[("for", "status")], "Filter by Status")?;
    html::write_start(w, "select", &[("id", "status"), ("name", "status")])?;
    for option in StatusFilter::ALL {
        let text = match option {
            StatusFilter::All => "All Statuses".to_owned(),
            StatusFilter::Only(status) => format!("{} {}", status.badge(), status.label()),
        };
        let value = option.as_str();
        if option == filter {
            html::write_text_element(w, "option", &[("value", value), ("selected", "selected")], &text)?;
        } else {
            html::write_text_element(w, "option", &[("value", value)], &text)?;
        }
    }
    html::write_end(w, "select")?;
    html::write_end(w, "form")
}

fn write_directory(
    w: &mut HtmlWriter,
    directory: &Directory,
    query: &str,
    filter: StatusFilter,
) -> Result<()> {
    let view = directory.view(query, filter);

    if is_landing(query, filter) {
        write_featured(w, "Top Clean Hotels", "", &view.top_clean)?;
        write_featured(w, "Recently Reported", "reported", &view.recently_reported)?;
        html::write_text_element(w, "h2", &[("class", "featured all-heading")], "All Hotels")?;
    }

    // Every status is rendered so the in-page filter can widen back to `all`.
    // Cards outside `filter` start hidden.
    let all = directory.view(query, StatusFilter::All);
    html::write_start(w, "div", &[("id", "all-hotels"), ("class", "grid")])?;
    for hotel in &all.filtered {
        write_hotel_card(w, hotel, !filter.matches(hotel.status))?;
    }
    html::write_end(w, "div")?;

    let empty_attrs: &[(&str, &str)] = if view.filtered.is_empty() {
        &[("id", "no-results"), ("class", "empty")]
    } else {
        &[("id", "no-results"), ("class", "empty"), ("hidden", "hidden")]
    };
    html::write_text_element(w, "p", empty_attrs, "No hotels found matching your criteria.")
}

fn write_featured(w: &mut HtmlWriter, heading: &str, class: &str, hotels: &[Hotel]) -> Result<()> {
    let section_class = if class.is_empty() {
        "featured".to_owned()
    } else {
        format!("featured {class}")
    };
    html::write_start(w, "section", &[("class", &section_class)])?;
    html::write_text_element(w, "h2", &[], heading)?;
    html::write_start(w, "div", &[("class", "grid")])?;
    for hotel in hotels {
        write_hotel_card(w, hotel, false)?;
    }
    html::write_end(w, "div")?;
    html::write_end(w, "section")
}

fn write_hotel_card(w: &mut HtmlWriter, hotel: &Hotel, hidden: bool) -> Result<()> {
    let name = hotel.name.to_lowercase();
    let city = hotel.city.to_lowercase();
    let mut attrs = vec![
        ("class", "card hotel-card"),
        ("data-name", name.as_str()),
        ("data-city", city.as_str()),
        ("data-status", hotel.status.slug()),
    ];
    if hidden {
        attrs.push(("hidden", "hidden"));
    }
    html::write_start(w, "div", &attrs)?;
    write_image(w, &hotel.image, &hotel.name)?;
    html::write_start(w, "div", &[("class", "card-body")])?;
    html::write_text_element(w, "h3", &[], &hotel.name)?;
    html::write_text_element(w, "p", &[("class", "muted")], &hotel.city)?;

    html::write_start(w, "div", &[("class", "rating")])?;
    write_stars(w, hotel)?;
    html::write_text_element(w, "span", &[("class", "price")], &hotel.price_range)?;
    html::write_end(w, "div")?;

    write_status_badge(w, hotel.status)?;
    html::write_text_element(
        w,
        "p",
        &[("class", "small muted")],
        &format!("Last Updated: {}", hotel.last_updated),
    )?;
    html::write_link(w, &routes::hotel(&hotel.id), "button", "View Details")?;
    html::write_end(w, "div")?;
    html::write_end(w, "div")
}

fn write_stars(w: &mut HtmlWriter, hotel: &Hotel) -> Result<()> {
    let filled = usize::from(hotel.stars());
    let stars = "★".repeat(filled) + &"☆".repeat(5 - filled);
    html::write_text_element(w, "span", &[("class", "stars")], &stars)?;
    html::write_text_element(
        w,
        "span",
        &[("class", "small muted")],
        &format!("({})", hotel.avg_rating),
    )
}

fn write_status_badge(w: &mut HtmlWriter, status: Status) -> Result<()> {
    let class = format!("badge {}", status.slug());
    html::write_text_element(
        w,
        "span",
        &[("class", &class)],
        &format!("{} {}", status.badge(), status.label()),
    )
}

fn write_image(w: &mut HtmlWriter, src: &str, alt: &str) -> Result<()> {
    if src.is_empty() {
        return Ok(());
    }
    html::write_empty(w, "img", &[("src", src), ("alt", alt), ("loading", "lazy")])
}

fn write_error_notice(w: &mut HtmlWriter, err: &SiteError) -> Result<()> {
    html::write_start(w, "section", &[("class", "error")])?;
    html::write_text_element(w, "h2", &[], &err.headline())?;
    html::write_text_element(w, "p", &[("class", "muted")], &err.to_string())?;
    html::write_end(w, "section")
}

// ============================================================================
// Hotel Detail
// ============================================================================

/// Detail page for the hotel as currently seen, local edits and reviews included.
pub fn hotel(layout: &Layout<'_>, view: &HotelView<'_>) -> Result<String> {
    let hotel = view.hotel();
    let route = routes::hotel(&view.canonical().id);
    let canonical = layout.canonical(&route);

    let mut doc = layout.document();
    let doc = doc.scope(
        Head::titled(&hotel.name)
            .description(format!(
                "Pest report details for {}, {}. Current status: {}.",
                hotel.name, hotel.city, hotel.status
            ))
            .image(&hotel.image)
            .json_ld(jsonld::hotel(hotel, canonical.as_deref()))
            .canonical(canonical),
    );

    layout.render(&doc, &route, |w| {
        html::write_start(w, "article", &[("class", "detail")])?;
        write_image(w, &hotel.image, &hotel.name)?;

        html::write_start(w, "header", &[])?;
        html::write_text_element(w, "div", &[("class", "eyebrow")], &hotel.city)?;
        html::write_text_element(w, "h1", &[], &hotel.name)?;
        if view.is_edited() {
            html::write_text_element(
                w,
                "p",
                &[("class", "notice")],
                "Hotel details updated locally. This change is not saved permanently.",
            )?;
        }
        html::write_text_element(
            w,
            "p",
            &[("class", "muted")],
            &format!("Last updated: {}", hotel.last_updated),
        )?;
        write_status_badge(w, hotel.status)?;
        html::write_start(w, "div", &[("class", "rating")])?;
        write_stars(w, hotel)?;
        html::write_text_element(w, "span", &[("class", "price")], &hotel.price_range)?;
        html::write_end(w, "div")?;
        html::write_end(w, "header")?;

        html::write_start(w, "section", &[])?;
        html::write_text_element(w, "h2", &[], "Description & Details")?;
        html::write_text_element(w, "p", &[("class", "prose")], &hotel.description)?;
        html::write_end(w, "section")?;

        write_reports(w, &hotel.reports, layout.base.data_url.as_deref())?;
        if !view.reviews().is_empty() {
            write_reviews(w, view.reviews())?;
        }
        html::write_end(w, "article")?;

        write_back_link(w, BackTo::Hotels)
    })
}

fn write_reports(w: &mut HtmlWriter, reports: &[Report], data_url: Option<&str>) -> Result<()> {
    html::write_start(w, "section", &[("class", "reports")])?;
    html::write_text_element(w, "h2", &[], "Pest Report Details")?;

    if reports.is_empty() {
        html::write_text_element(
            w,
            "p",
            &[("class", "empty")],
            "No pest issues have been reported for this hotel. All clear!",
        )?;
    }
    for report in reports {
        html::write_start(w, "div", &[("class", "report")])?;
        html::write_text_element(w, "p", &[("class", "pest")], &report.pest)?;
        html::write_text_element(w, "p", &[("class", "small muted")], &report.date)?;
        html::write_start(w, "p", &[])?;
        html::write_text_element(w, "strong", &[], "Notes:")?;
        html::write_text(w, &format!(" {}", report.notes))?;
        html::write_end(w, "p")?;
        html::write_end(w, "div")?;
    }

    html::write_start(w, "div", &[("class", "disclaimer")])?;
    html::write_text_element(
        w,
        "p",
        &[],
        "All reports are submitted by the community and are not independently verified.",
    )?;
    html::write_start(w, "p", &[])?;
    html::write_text(w, "Think this is incorrect? ")?;
    match data_url {
        Some(url) => html::write_link(w, url, "", "You can help by contributing.")?,
        None => html::write_text(w, "You can help by contributing.")?,
    }
    html::write_end(w, "p")?;
    html::write_end(w, "div")?;
    html::write_end(w, "section")
}

fn write_reviews(w: &mut HtmlWriter, reviews: &[UserReview]) -> Result<()> {
    html::write_start(w, "section", &[("class", "reviews")])?;
    html::write_text_element(w, "h2", &[], "Visitor Reviews")?;
    html::write_text_element(
        w,
        "p",
        &[("class", "small muted")],
        "Reviews added during this preview are not saved.",
    )?;
    for review in reviews {
        let rating = usize::from(review.rating);
        html::write_start(w, "blockquote", &[("class", "review")])?;
        html::write_text_element(
            w,
            "span",
            &[("class", "stars")],
            &("★".repeat(rating) + &"☆".repeat(5 - rating)),
        )?;
        html::write_text_element(w, "p", &[], &review.comment)?;
        html::write_text_element(w, "cite", &[], &review.author)?;
        html::write_end(w, "blockquote")?;
    }
    html::write_end(w, "section")
}

// ============================================================================
// Blog
// ============================================================================

/// Blog listing for one category (or all).
pub fn blog_index(layout: &Layout<'_>, index: &BlogIndex, active: &CategoryFilter) -> Result<String> {
    let route = routes::category(active);
    let title = match active {
        CategoryFilter::All => "Blog".to_owned(),
        CategoryFilter::Named(name) => format!("{name} | Blog"),
    };

    let mut doc = layout.document();
    let doc = doc.scope(
        Head::titled(title)
            .description(BLOG_DESCRIPTION)
            .canonical(layout.canonical(&route)),
    );

    layout.render(&doc, &route, |w| {
        html::write_start(w, "section", &[("class", "hero")])?;
        html::write_text_element(w, "h1", &[], "Our Blog")?;
        html::write_text_element(
            w,
            "p",
            &[],
            "Insights on travel safety, pest prevention, and community updates.",
        )?;
        html::write_end(w, "section")?;

        html::write_start(w, "nav", &[("class", "categories")])?;
        for category in index.categories() {
            let class = if category == active { "pill active" } else { "pill" };
            html::write_link(w, &routes::category(category), class, category.label())?;
        }
        html::write_end(w, "nav")?;

        let posts = index.filter(active);
        if posts.is_empty() {
            return html::write_text_element(
                w,
                "p",
                &[("class", "empty")],
                "No posts found in this category.",
            );
        }
        html::write_start(w, "div", &[("class", "grid")])?;
        for post in posts {
            write_post_card(w, post)?;
        }
        html::write_end(w, "div")
    })
}

fn write_post_card(w: &mut HtmlWriter, post: &BlogPost) -> Result<()> {
    html::write_start(w, "div", &[("class", "card post-card")])?;
    write_image(w, &post.image, &post.title)?;
    html::write_start(w, "div", &[("class", "card-body")])?;
    write_category_tag(w, post)?;
    html::write_text_element(w, "h3", &[], &post.title)?;
    write_byline(w, post)?;
    html::write_text_element(w, "p", &[], &post.excerpt)?;
    html::write_link(w, &routes::post(&post.id), "button", "Read More")?;
    html::write_end(w, "div")?;
    html::write_end(w, "div")
}

fn write_category_tag(w: &mut HtmlWriter, post: &BlogPost) -> Result<()> {
    let category = CategoryFilter::Named(post.category.clone());
    html::write_link(w, &routes::category(&category), "pill", &post.category)
}

fn write_byline(w: &mut HtmlWriter, post: &BlogPost) -> Result<()> {
    html::write_text_element(
        w,
        "p",
        &[("class", "small muted")],
        &format!("By {} on {}", post.author, date::display(&post.date)),
    )
}

/// A single post with its Markdown body.
pub fn post(layout: &Layout<'_>, post: &BlogPost) -> Result<String> {
    let route = routes::post(&post.id);
    let canonical = layout.canonical(&route);

    let mut doc = layout.document();
    let doc = doc.scope(
        Head::titled(&post.title)
            .description(&post.excerpt)
            .image(&post.image)
            .json_ld(jsonld::article(post, &layout.base.title, canonical.as_deref()))
            .canonical(canonical),
    );

    layout.render(&doc, &route, |w| {
        html::write_start(w, "article", &[("class", "detail post")])?;
        write_image(w, &post.image, &post.title)?;
        write_category_tag(w, post)?;
        html::write_text_element(w, "h1", &[], &post.title)?;
        write_byline(w, post)?;
        html::write_start(w, "div", &[("class", "prose")])?;
        markdown::write_html(w, post.body())?;
        html::write_end(w, "div")?;
        html::write_end(w, "article")?;
        write_back_link(w, BackTo::Posts)
    })
}

// ============================================================================
// Static and Error Pages
// ============================================================================

pub fn static_page(layout: &Layout<'_>, page: &StaticPage) -> Result<String> {
    let route = routes::page(&page.slug);

    let mut head = Head::titled(&page.title).canonical(layout.canonical(&route));
    if let Some(description) = &page.description {
        head = head.description(description);
    }
    let mut doc = layout.document();
    let doc = doc.scope(head);

    layout.render(&doc, &route, |w| {
        html::write_start(w, "article", &[("class", "prose page")])?;
        html::write_text_element(w, "h1", &[], &page.title)?;
        markdown::write_html(w, &page.body)?;
        html::write_end(w, "article")
    })
}

/// Terminal error state for a page whose data failed to load.
pub fn error_page(layout: &Layout<'_>, route: &str, err: &SiteError, back: BackTo) -> Result<String> {
    let title = if err.is_not_found() { "Not Found" } else { "Error" };

    let mut doc = layout.document();
    let doc = doc.scope(Head::titled(title).description(err.headline()));

    layout.render(&doc, route, |w| {
        write_error_notice(w, err)?;
        write_back_link(w, back)
    })
}

/// Catch-all page written to `/404.html`.
pub fn not_found(layout: &Layout<'_>) -> Result<String> {
    let mut doc = layout.document();
    let doc = doc.scope(Head::titled("Page not found"));

    layout.render(&doc, routes::NOT_FOUND, |w| {
        html::write_start(w, "section", &[("class", "error")])?;
        html::write_text_element(w, "h1", &[], "Page not found")?;
        html::write_text_element(w, "p", &[], "The page you requested does not exist.")?;
        html::write_end(w, "section")?;
        write_back_link(w, BackTo::Home)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseConfig;
    use crate::model::test_hotel;
    use crate::view::derive;

    fn base() -> BaseConfig {
        BaseConfig {
            title: "BedBug Tracker".into(),
            url: Some("https://bugs.example.org".into()),
            ..BaseConfig::default()
        }
    }

    fn sample_hotels() -> Vec<Hotel> {
        let mut clean = test_hotel("grand", Status::Clean, "2024-07-10");
        clean.name = "Grand Plaza".into();
        let mut reported = test_hotel("palm", Status::PestReported, "2024-07-15");
        reported.name = "Palm Residency".into();
        reported.reports.push(Report {
            pest: "Bedbugs".into(),
            date: "2024-07-14".into(),
            notes: "Room 203 <mattress>".into(),
        });
        vec![clean, reported]
    }

    fn post(id: &str, category: &str) -> BlogPost {
        BlogPost {
            id: id.into(),
            title: format!("Post {id}"),
            author: "Ann".into(),
            date: "2024-07-01".into(),
            category: category.into(),
            excerpt: "Short".into(),
            image: "/p.png".into(),
            content: Some("First **bold** para.\n\n1. one\n2. two".into()),
        }
    }

    #[test]
    fn test_home_landing_has_featured_sections() {
        let base = base();
        let layout = Layout::new(&base, []);
        let directory = Directory::new(sample_hotels());
        let out = directory_html(&layout, &directory, "", StatusFilter::All);

        assert!(out.contains("<title>Hotel Directory | BedBug Tracker</title>"));
        assert!(out.contains("Top Clean Hotels"));
        assert!(out.contains("Recently Reported"));
        // Newest first in the full list
        let palm = out.rfind("Palm Residency").unwrap();
        let grand = out.rfind("Grand Plaza").unwrap();
        assert!(palm < grand);
    }

    fn directory_html(layout: &Layout<'_>, d: &Directory, q: &str, f: StatusFilter) -> String {
        directory(layout, Ok(d), q, f).unwrap()
    }

    #[test]
    fn test_status_page_skips_featured() {
        let base = base();
        let layout = Layout::new(&base, []);
        let directory = Directory::new(sample_hotels());
        let out = directory_html(&layout, &directory, "", StatusFilter::Only(Status::Clean));

        assert!(out.contains("<title>Clean Hotels | BedBug Tracker</title>"));
        assert!(!out.contains("Top Clean Hotels"));
        assert!(out.contains(r#"<option value="clean" selected="selected">"#));
        // Other statuses are present but hidden, so picking "all" shows them
        assert!(out.contains(r#"data-status="clean">"#));
        assert!(out.contains(r#"data-status="pest-reported" hidden="hidden">"#));
        assert!(out.contains(r#"id="no-results" class="empty" hidden="hidden""#));
    }

    #[test]
    fn test_status_page_holds_full_listing() {
        let base = base();
        let layout = Layout::new(&base, []);
        let hotels = sample_hotels();
        let directory = Directory::new(hotels.clone());
        let all = derive(&hotels, "", StatusFilter::All);

        for filter in StatusFilter::ALL {
            let out = directory_html(&layout, &directory, "", filter);
            let grid = &out[out.find(r#"id="all-hotels""#).unwrap()..];
            let grid = &grid[..grid.find("no-results").unwrap()];

            // Cards in `derive(.., all)` order; only `filter` matches are visible
            let mut cursor = 0;
            for hotel in &all.filtered {
                let href = format!(r#"href="{}""#, routes::hotel(&hotel.id));
                let at = cursor + grid[cursor..].find(&href).unwrap();
                let card = &grid[..at];
                let open = &card[card.rfind("hotel-card").unwrap()..];
                assert_eq!(open.contains("hidden"), !filter.matches(hotel.status), "{filter}");
                cursor = at + href.len();
            }
        }
    }

    #[test]
    fn test_home_error_state() {
        let base = base();
        let layout = Layout::new(&base, []);
        let err = SiteError::fetch("data/hotels.json", "No such file");
        let out = directory(&layout, Err(&err), "", StatusFilter::All).unwrap();

        assert!(out.contains("Could not load data."));
        assert!(!out.contains("Top Clean Hotels"));
    }

    #[test]
    fn test_empty_directory_message() {
        let base = base();
        let layout = Layout::new(&base, []);
        let directory = Directory::new(Vec::new());
        let out = directory_html(&layout, &directory, "", StatusFilter::All);

        assert!(out.contains(r#"<p id="no-results" class="empty">No hotels found"#));
    }

    #[test]
    fn test_hotel_detail() {
        let base = base();
        let layout = Layout::new(&base, []);
        let hotels = sample_hotels();
        let view = HotelView::new(&hotels[1]);
        let out = hotel(&layout, &view).unwrap();

        assert!(out.contains("<title>Palm Residency | BedBug Tracker</title>"));
        assert!(out.contains(
            "Pest report details for Palm Residency, Nowhere. Current status: Pest Reported."
        ));
        assert!(out.contains(r#""@type":"Hotel""#));
        assert!(out.contains(r#""url":"https://bugs.example.org/hotel/palm/""#));
        // Report notes are escaped in the body and in JSON-LD
        assert!(out.contains("Room 203 &lt;mattress&gt;"));
        assert!(out.contains("\\u003cmattress>"));
        assert!(out.contains("not independently verified"));
        assert!(out.contains("← Back to all hotels"));
        assert!(!out.contains("Visitor Reviews"));
    }

    #[test]
    fn test_hotel_detail_with_local_edits() {
        let base = base();
        let layout = Layout::new(&base, []);
        let hotels = sample_hotels();
        let mut view = HotelView::new(&hotels[0]);
        view.begin_edit();
        view.set(crate::view::EditField::Name, "Grand Plaza Renamed").unwrap();
        view.save().unwrap();
        view.add_review(5, "Bea", "Spotless").unwrap();

        let out = hotel(&layout, &view).unwrap();
        assert!(out.contains("<h1>Grand Plaza Renamed</h1>"));
        assert!(out.contains("updated locally"));
        assert!(out.contains("Visitor Reviews"));
        assert!(out.contains("<cite>Bea</cite>"));
        assert!(out.contains("No pest issues have been reported for this hotel. All clear!"));
        // Canonical record untouched
        assert_eq!(hotels[0].name, "Grand Plaza");
    }

    #[test]
    fn test_blog_index_categories() {
        let base = base();
        let layout = Layout::new(&base, []);
        let index = BlogIndex::new(vec![post("a", "Guides"), post("b", "News")]);

        let all = blog_index(&layout, &index, &CategoryFilter::All).unwrap();
        assert!(all.contains("<title>Blog | BedBug Tracker</title>"));
        assert!(all.contains(r#"<a href="/blog/" class="pill active">All</a>"#));
        assert!(all.contains("Post a") && all.contains("Post b"));

        let news = CategoryFilter::Named("News".into());
        let out = blog_index(&layout, &index, &news).unwrap();
        assert!(out.contains(r#"<a href="/blog/category/news/" class="pill active">News</a>"#));
        assert!(out.contains("Post b"));
        assert!(!out.contains("Post a"));

        let unknown = CategoryFilter::Named("Nope".into());
        let out = blog_index(&layout, &index, &unknown).unwrap();
        assert!(out.contains("No posts found in this category."));
    }

    #[test]
    fn test_post_page() {
        let base = base();
        let layout = Layout::new(&base, []);
        let out = super::post(&layout, &post("a", "Guides")).unwrap();

        assert!(out.contains("<title>Post a | BedBug Tracker</title>"));
        assert!(out.contains("By Ann on July 1, 2024"));
        assert!(out.contains("<p>First <strong>bold</strong> para.</p>"));
        assert!(out.contains("<ol><li>one</li><li>two</li></ol>"));
        assert!(out.contains(r#""@type":"Article""#));
        assert!(out.contains("← Back to all posts"));
    }

    #[test]
    fn test_error_page() {
        let base = base();
        let layout = Layout::new(&base, []);
        let err = SiteError::not_found("post", "ghost");
        let out = error_page(&layout, "/blog/ghost/", &err, BackTo::Posts).unwrap();

        assert!(out.contains("<title>Not Found | BedBug Tracker</title>"));
        assert!(out.contains("This post doesn"));
        assert!(out.contains(r#"<a href="/blog/">← Back to all posts</a>"#));
    }

    #[test]
    fn test_static_page_and_404() {
        let base = base();
        let page = StaticPage {
            slug: "about".into(),
            title: "About".into(),
            description: Some("Who we are".into()),
            body: "We are **travelers**.".into(),
        };
        let layout = Layout::new(&base, [&page]);

        let out = static_page(&layout, &page).unwrap();
        assert!(out.contains("<title>About | BedBug Tracker</title>"));
        assert!(out.contains(r#"content="Who we are""#));
        assert!(out.contains("<strong>travelers</strong>"));
        assert!(out.contains(r#"<a href="/about/" class="active">About</a>"#));

        let out = not_found(&layout).unwrap();
        assert!(out.contains("<title>Page not found | BedBug Tracker</title>"));
    }
}
