//! Page-level error kinds.
//!
//! Every variant is recovered at the page boundary: the affected page renders
//! a terminal message with a link back to its list view.

use crate::content::FrontMatterError;
use thiserror::Error;

/// Errors produced while loading the data behind a page.
#[derive(Debug, Error)]
pub enum SiteError {
    /// A collection or file could not be read or decoded.
    #[error("failed to load {what}: {reason}")]
    Fetch { what: String, reason: String },

    /// Front matter delimiters missing.
    #[error("format error: {0}")]
    Format(String),

    /// Required metadata missing or inconsistent.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested id absent from the loaded collection.
    #[error("{kind} `{id}` not found")]
    NotFound { kind: &'static str, id: String },
}

impl SiteError {
    pub fn fetch(what: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Headline shown on the error page.
    pub fn headline(&self) -> String {
        match self {
            Self::NotFound { kind, .. } => format!("This {kind} doesn't exist."),
            Self::Fetch { .. } => "Could not load data.".to_owned(),
            Self::Format(_) | Self::Validation(_) => "This page could not be displayed.".to_owned(),
        }
    }
}

impl From<FrontMatterError> for SiteError {
    fn from(err: FrontMatterError) -> Self {
        match err {
            FrontMatterError::Format => Self::Format(err.to_string()),
            FrontMatterError::Validation(_) => Self::Validation(err.to_string()),
        }
    }
}
