//! Hotel directory view model.
//!
//! [`derive`] is the pure projection; [`Directory`] owns one snapshot and
//! memoizes projections for the pages and the search endpoint.

use crate::model::{Hotel, Status};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::{
    fmt,
    str::FromStr,
    sync::{Arc, OnceLock},
};
use thiserror::Error;

/// Length of the curated "top clean" and "recently reported" lists.
pub const FEATURED_LIMIT: usize = 3;

/// Memoized views kept per snapshot before the cache is reset.
const MAX_CACHED_VIEWS: usize = 256;

// ============================================================================
// Status Filter
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status filter `{0}`, expected one of: all, clean, pest-reported")]
pub struct FilterParseError(pub String);

impl StatusFilter {
    /// Every filter, in display order.
    pub const ALL: [StatusFilter; 3] = [
        StatusFilter::All,
        StatusFilter::Only(Status::Clean),
        StatusFilter::Only(Status::PestReported),
    ];

    #[inline]
    pub fn matches(self, status: Status) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }

    /// Query-string form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.slug(),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(status) => status.label(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "clean" => Ok(Self::Only(Status::Clean)),
            "pest-reported" | "pest reported" | "pestreported" => {
                Ok(Self::Only(Status::PestReported))
            }
            _ => Err(FilterParseError(s.to_owned())),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Derivation
// ============================================================================

/// Filtered listing plus the two curated lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryView {
    pub filtered: Vec<Hotel>,
    pub top_clean: Vec<Hotel>,
    pub recently_reported: Vec<Hotel>,
}

/// Curated lists are computed from the whole snapshot and ignore the query.
#[derive(Debug, Clone, Default, PartialEq)]
struct Curated {
    top_clean: Vec<Hotel>,
    recently_reported: Vec<Hotel>,
}

impl Curated {
    fn from_hotels(hotels: &[Hotel]) -> Self {
        let newest = |status: Status| {
            let mut list = newest_first(hotels.iter().filter(|h| h.status == status));
            list.truncate(FEATURED_LIMIT);
            list
        };
        Self {
            top_clean: newest(Status::Clean),
            recently_reported: newest(Status::PestReported),
        }
    }
}

/// Collect and sort descending by `last_updated`. Ties keep input order.
fn newest_first<'a>(hotels: impl Iterator<Item = &'a Hotel>) -> Vec<Hotel> {
    let mut list: Vec<Hotel> = hotels.cloned().collect();
    list.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
    list
}

fn filtered(hotels: &[Hotel], query: &str, filter: StatusFilter) -> Vec<Hotel> {
    let needle = query.to_lowercase();
    newest_first(
        hotels
            .iter()
            .filter(|h| filter.matches(h.status) && h.matches_lowercase(&needle)),
    )
}

/// Project `hotels` through a text query and a status filter.
///
/// The query is a literal, case-insensitive substring matched against name
/// or city.
pub fn derive(hotels: &[Hotel], query: &str, filter: StatusFilter) -> DirectoryView {
    let curated = Curated::from_hotels(hotels);
    DirectoryView {
        filtered: filtered(hotels, query, filter),
        top_clean: curated.top_clean,
        recently_reported: curated.recently_reported,
    }
}

/// Whether the curated sections belong on this view (the unfiltered landing page).
#[inline]
pub fn is_landing(query: &str, filter: StatusFilter) -> bool {
    query.is_empty() && filter == StatusFilter::All
}

// ============================================================================
// Memoized Directory
// ============================================================================

/// One hotel snapshot plus memoized projections of it.
///
/// A new snapshot means a new `Directory`; cached views never outlive their data.
#[derive(Debug)]
pub struct Directory {
    hotels: Arc<[Hotel]>,
    curated: OnceLock<Curated>,
    views: RwLock<FxHashMap<(String, StatusFilter), Arc<DirectoryView>>>,
}

impl Directory {
    pub fn new(hotels: impl Into<Arc<[Hotel]>>) -> Self {
        Self {
            hotels: hotels.into(),
            curated: OnceLock::new(),
            views: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn hotels(&self) -> &[Hotel] {
        &self.hotels
    }

    pub fn get(&self, id: &str) -> Option<&Hotel> {
        self.hotels.iter().find(|h| h.id == id)
    }

    fn curated(&self) -> &Curated {
        self.curated.get_or_init(|| Curated::from_hotels(&self.hotels))
    }

    /// Memoized equivalent of [`derive`].
    pub fn view(&self, query: &str, filter: StatusFilter) -> Arc<DirectoryView> {
        let key = (query.to_owned(), filter);

        // Fast path: read lock only
        if let Some(view) = self.views.read().get(&key) {
            return Arc::clone(view);
        }

        let curated = self.curated();
        let view = Arc::new(DirectoryView {
            filtered: filtered(&self.hotels, query, filter),
            top_clean: curated.top_clean.clone(),
            recently_reported: curated.recently_reported.clone(),
        });

        let mut views = self.views.write();
        if views.len() >= MAX_CACHED_VIEWS {
            views.clear();
        }
        // Another thread may have raced us here; keep the first one
        Arc::clone(views.entry(key).or_insert(view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_hotel as hotel;

    fn ids(list: &[Hotel]) -> Vec<&str> {
        list.iter().map(|h| h.id.as_str()).collect()
    }

    fn sample() -> Vec<Hotel> {
        let mut hotels = vec![
            hotel("grand", Status::Clean, "2024-07-10"),
            hotel("palm", Status::PestReported, "2024-06-22"),
            hotel("sea", Status::Clean, "2024-07-18"),
            hotel("city", Status::PestReported, "2024-07-01"),
            hotel("mount", Status::Clean, "2024-05-30"),
            hotel("lake", Status::Clean, "2024-07-18"),
            hotel("river", Status::PestReported, "2024-07-18"),
            hotel("old", Status::PestReported, "2023-12-01"),
        ];
        hotels[0].name = "Grand Plaza".into();
        hotels[0].city = "New York".into();
        hotels[1].name = "Palm Residency".into();
        hotels[1].city = "Mumbai".into();
        hotels[2].city = "Goa".into();
        hotels
    }

    #[test]
    fn test_worked_example() {
        let hotels = vec![
            hotel("a", Status::Clean, "2024-07-01"),
            hotel("b", Status::PestReported, "2024-07-15"),
        ];
        let view = derive(&hotels, "", StatusFilter::All);
        assert_eq!(ids(&view.filtered), ["b", "a"]);
        assert_eq!(ids(&view.top_clean), ["a"]);
        assert_eq!(ids(&view.recently_reported), ["b"]);
    }

    #[test]
    fn test_empty_input() {
        let view = derive(&[], "anything", StatusFilter::Only(Status::Clean));
        assert_eq!(view, DirectoryView::default());
    }

    #[test]
    fn test_sorted_and_stable() {
        let view = derive(&sample(), "", StatusFilter::All);
        // sea, lake and river share a date and keep input order
        assert_eq!(
            ids(&view.filtered),
            ["sea", "lake", "river", "grand", "city", "palm", "mount", "old"]
        );
        assert!(
            view.filtered
                .windows(2)
                .all(|w| w[0].last_updated >= w[1].last_updated)
        );
    }

    #[test]
    fn test_filter_sound_and_complete() {
        let hotels = sample();
        for filter in StatusFilter::ALL {
            for query in ["", "o", "GRAND", "mumbai", "zzz"] {
                let view = derive(&hotels, query, filter);
                let needle = query.to_lowercase();
                let expected = hotels
                    .iter()
                    .filter(|h| filter.matches(h.status) && h.matches_lowercase(&needle))
                    .count();
                assert_eq!(view.filtered.len(), expected, "{query:?} {filter}");
                assert!(
                    view.filtered
                        .iter()
                        .all(|h| filter.matches(h.status) && h.matches_lowercase(&needle))
                );
            }
        }
    }

    #[test]
    fn test_query_matches_name_or_city_case_insensitive() {
        let hotels = sample();
        assert_eq!(ids(&derive(&hotels, "plaza", StatusFilter::All).filtered), ["grand"]);
        assert_eq!(ids(&derive(&hotels, "NEW YORK", StatusFilter::All).filtered), ["grand"]);
        assert_eq!(
            ids(&derive(&hotels, "mumbai", StatusFilter::Only(Status::Clean)).filtered),
            Vec::<&str>::new()
        );
    }

    #[test]
    fn test_query_is_literal() {
        let mut hotels = sample();
        hotels[3].name = "Hotel (City) .*".into();
        assert_eq!(ids(&derive(&hotels, "(city) .*", StatusFilter::All).filtered), ["city"]);
        assert!(derive(&hotels, "g.and", StatusFilter::All).filtered.is_empty());
    }

    #[test]
    fn test_curated_ignore_query_and_filter() {
        let hotels = sample();
        let base = derive(&hotels, "", StatusFilter::All);
        assert_eq!(ids(&base.top_clean), ["sea", "lake", "grand"]);
        assert_eq!(ids(&base.recently_reported), ["river", "city", "palm"]);

        let narrowed = derive(&hotels, "zzz", StatusFilter::Only(Status::Clean));
        assert!(narrowed.filtered.is_empty());
        assert_eq!(narrowed.top_clean, base.top_clean);
        assert_eq!(narrowed.recently_reported, base.recently_reported);
    }

    #[test]
    fn test_curated_shorter_than_limit() {
        let hotels = vec![hotel("only", Status::Clean, "2024-01-01")];
        let view = derive(&hotels, "", StatusFilter::All);
        assert_eq!(view.top_clean.len(), 1);
        assert!(view.recently_reported.is_empty());
    }

    #[test]
    fn test_directory_matches_derive_and_memoizes() {
        let directory = Directory::new(sample());
        for filter in StatusFilter::ALL {
            let view = directory.view("o", filter);
            assert_eq!(*view, derive(directory.hotels(), "o", filter));
        }

        let first = directory.view("", StatusFilter::All);
        let second = directory.view("", StatusFilter::All);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(directory.get("palm").map(|h| h.city.as_str()), Some("Mumbai"));
        assert!(directory.get("missing").is_none());
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("all".parse(), Ok(StatusFilter::All));
        assert_eq!("".parse(), Ok(StatusFilter::All));
        assert_eq!("Clean".parse(), Ok(StatusFilter::Only(Status::Clean)));
        assert_eq!(
            "pest-reported".parse(),
            Ok(StatusFilter::Only(Status::PestReported))
        );
        assert_eq!(
            "Pest Reported".parse(),
            Ok(StatusFilter::Only(Status::PestReported))
        );
        assert_eq!(
            "PestReported".parse(),
            Ok(StatusFilter::Only(Status::PestReported))
        );
        let err = "haunted".parse::<StatusFilter>().unwrap_err();
        assert!(err.to_string().contains("haunted"));
    }

    #[test]
    fn test_status_filter_rejects_mangled_spellings() {
        for input in ["c-l-e-a-n", "p e s t reported", "pest_reported", "a l l", "pest--reported"] {
            assert_eq!(
                input.parse::<StatusFilter>(),
                Err(FilterParseError(input.to_owned())),
                "{input}"
            );
        }
    }

    #[test]
    fn test_status_filter_round_trip() {
        for filter in StatusFilter::ALL {
            assert_eq!(filter.as_str().parse(), Ok(filter));
        }
    }

    #[test]
    fn test_is_landing() {
        assert!(is_landing("", StatusFilter::All));
        assert!(!is_landing("x", StatusFilter::All));
        assert!(!is_landing("", StatusFilter::Only(Status::Clean)));
    }
}
