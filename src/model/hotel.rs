//! Hotel records and their pest reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared cleanliness status of a hotel.
///
/// Serialized as `"Clean"` / `"Pest Reported"` to match the published data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Clean,
    #[serde(rename = "Pest Reported", alias = "PestReported")]
    PestReported,
}

impl Status {
    /// Human-readable label, identical to the serialized form.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Clean => "Clean",
            Self::PestReported => "Pest Reported",
        }
    }

    /// URL segment used for the per-status listing pages.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::PestReported => "pest-reported",
        }
    }

    pub const fn badge(self) -> &'static str {
        match self {
            Self::Clean => "✅",
            Self::PestReported => "⚠️",
        }
    }

    pub const ALL: [Status; 2] = [Status::Clean, Status::PestReported];
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single community-submitted pest report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Pest type, free text (e.g. "Bedbugs").
    #[serde(rename = "type")]
    pub pest: String,
    pub date: String,
    pub notes: String,
}

/// A hotel listing from the directory snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub city: String,
    pub status: Status,
    /// ISO date (`YYYY-MM-DD`); ordering is lexicographic.
    pub last_updated: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub avg_rating: f32,
    #[serde(default)]
    pub price_range: String,
}

/// Mismatch between a hotel's declared status and its reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMismatch {
    /// Declared clean while reports exist.
    CleanWithReports(usize),
    /// Declared pest-reported with no reports on file.
    ReportedWithoutReports,
}

impl fmt::Display for StatusMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CleanWithReports(n) => write!(f, "marked Clean but has {n} report(s)"),
            Self::ReportedWithoutReports => f.write_str("marked Pest Reported but has no reports"),
        }
    }
}

impl Hotel {
    /// Case-insensitive literal substring match against name or city.
    ///
    /// `needle` must already be lowercased; an empty needle matches everything.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.city.to_lowercase().contains(needle)
    }

    /// Rating rounded to whole stars, clamped to 0..=5.
    pub fn stars(&self) -> u8 {
        self.avg_rating.round().clamp(0.0, 5.0) as u8
    }

    /// Report status/report disagreement. Never corrected, only surfaced.
    pub fn status_mismatch(&self) -> Option<StatusMismatch> {
        match (self.status, self.reports.len()) {
            (Status::Clean, 0) | (Status::PestReported, 1..) => None,
            (Status::Clean, n) => Some(StatusMismatch::CleanWithReports(n)),
            (Status::PestReported, 0) => Some(StatusMismatch::ReportedWithoutReports),
        }
    }
}

#[cfg(test)]
pub(crate) fn hotel(id: &str, status: Status, last_updated: &str) -> Hotel {
    Hotel {
        id: id.to_string(),
        name: format!("Hotel {id}"),
        city: "Nowhere".to_string(),
        status,
        last_updated: last_updated.to_string(),
        description: String::new(),
        reports: vec![],
        image: String::new(),
        avg_rating: 0.0,
        price_range: "$".to_string(),
    }
}
