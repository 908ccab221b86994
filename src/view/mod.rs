//! Derived, read-only projections of loaded data, plus per-visit view state.

pub mod blog;
pub mod directory;
pub mod state;

pub use blog::{BlogIndex, CategoryFilter, category_slug};
pub use directory::{
    Directory, DirectoryView, FEATURED_LIMIT, FilterParseError, StatusFilter, derive, is_landing,
};
pub use state::{EditError, EditField, HotelView, parse_edit};
