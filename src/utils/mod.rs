//! Shared helpers.

pub mod category;
pub mod date;
pub mod hash;
pub mod html;
pub mod minify;
pub mod slug;
