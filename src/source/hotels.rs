//! Hotel snapshot loading and data-quality audit.

use crate::error::SiteError;
use crate::model::{Hotel, StatusMismatch};
use crate::utils::date::is_iso_date;
use rustc_hash::FxHashSet;
use std::{fmt, path::Path};

/// Decode a JSON array of hotels.
pub fn parse_hotels(json: &str, origin: &Path) -> Result<Vec<Hotel>, SiteError> {
    serde_json::from_str(json).map_err(|err| SiteError::fetch(origin.display().to_string(), err))
}

/// Read and decode the hotel snapshot.
pub async fn fetch_hotels(path: &Path) -> Result<Vec<Hotel>, SiteError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| SiteError::fetch(path.display().to_string(), err))?;
    parse_hotels(&json, path)
}

/// Blocking variant of [`fetch_hotels`].
pub fn read_hotels(path: &Path) -> Result<Vec<Hotel>, SiteError> {
    let json = std::fs::read_to_string(path)
        .map_err(|err| SiteError::fetch(path.display().to_string(), err))?;
    parse_hotels(&json, path)
}

// ============================================================================
// Audit
// ============================================================================

/// Data-quality finding. Reported, never corrected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditWarning {
    Status { id: String, mismatch: StatusMismatch },
    DuplicateId(String),
    Date { id: String, value: String },
}

impl fmt::Display for AuditWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { id, mismatch } => write!(f, "hotel `{id}` {mismatch}"),
            Self::DuplicateId(id) => write!(f, "duplicate hotel id `{id}`"),
            Self::Date { id, value } => write!(
                f,
                "hotel `{id}` has lastUpdated `{value}`, expected YYYY-MM-DD (ordering may be wrong)"
            ),
        }
    }
}

pub fn audit(hotels: &[Hotel]) -> Vec<AuditWarning> {
    let mut seen = FxHashSet::default();
    let mut warnings = Vec::new();

    for hotel in hotels {
        if !seen.insert(hotel.id.as_str()) {
            warnings.push(AuditWarning::DuplicateId(hotel.id.clone()));
        }
        if let Some(mismatch) = hotel.status_mismatch() {
            warnings.push(AuditWarning::Status {
                id: hotel.id.clone(),
                mismatch,
            });
        }
        if !is_iso_date(&hotel.last_updated) {
            warnings.push(AuditWarning::Date {
                id: hotel.id.clone(),
                value: hotel.last_updated.clone(),
            });
        }
    }
    warnings
}
