//! Immutable value records loaded from the site's data sources.

mod hotel;
mod post;
mod review;

pub use hotel::{Hotel, Report, Status, StatusMismatch};
pub use post::{BlogPost, StaticPage};
pub use review::{ReviewError, UserReview};

#[cfg(test)]
pub(crate) use hotel::hotel as test_hotel;
