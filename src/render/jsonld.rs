//! schema.org structured data for hotel and article pages.

use crate::model::{BlogPost, Hotel};
use serde_json::{Value, json};

/// Author credited on every community report.
pub const COMMUNITY_AUTHOR: &str = "Community Contributor";

/// `Hotel` with its address and one `Review` per pest report.
pub fn hotel(hotel: &Hotel, url: Option<&str>) -> Value {
    let mut data = json!({
        "@context": "https://schema.org",
        "@type": "Hotel",
        "name": hotel.name,
        "address": {
            "@type": "PostalAddress",
            "addressLocality": hotel.city,
        },
        "image": hotel.image,
        "description": format!(
            "Check the latest community-sourced pest reports for {} in {}. Current status: {}.",
            hotel.name, hotel.city, hotel.status
        ),
    });

    if !hotel.reports.is_empty() {
        let reviews: Vec<Value> = hotel
            .reports
            .iter()
            .map(|report| {
                json!({
                    "@type": "Review",
                    "reviewBody": format!("Pest report: {}. Notes: {}", report.pest, report.notes),
                    "datePublished": report.date,
                    "author": { "@type": "Person", "name": COMMUNITY_AUTHOR },
                })
            })
            .collect();
        data["review"] = Value::Array(reviews);
    }
    if let Some(url) = url {
        data["url"] = Value::from(url);
    }
    data
}

/// `Article` published under the site's name.
pub fn article(post: &BlogPost, publisher: &str, url: Option<&str>) -> Value {
    let mut data = json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": post.title,
        "image": post.image,
        "author": { "@type": "Person", "name": post.author },
        "publisher": { "@type": "Organization", "name": publisher },
        "datePublished": post.date,
        "dateModified": post.date,
        "description": post.excerpt,
        "articleBody": post.body(),
    });
    if let Some(url) = url {
        data["mainEntityOfPage"] = Value::from(url);
    }
    data
}

/// Serialize for a `<script type="application/ld+json">` body.
///
/// `<` is escaped so a value can never close the script element.
pub fn script_body(data: &Value) -> String {
    data.to_string().replace('<', "\\u003c")
}
