pub mod badge;
pub mod checkin;
pub mod config;
pub mod status;
pub mod sync;
pub mod tracker;

use chrono::{DateTime, NaiveDate, Utc};
use unhooked_core::{Catalog, Database, TrackerService};

/// Open the service over the on-disk database and built-in catalog.
pub fn open_service() -> Result<TrackerService<Database>, Box<dyn std::error::Error>> {
    Ok(TrackerService::new(Database::open()?, Catalog::builtin()))
}

/// Resolve an explicit tracker id, falling back to the active tracker.
pub fn resolve_tracker(
    service: &TrackerService<Database>,
    id: Option<String>,
) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(id) = id {
        return Ok(id);
    }
    match service.active_tracker()? {
        Some(tracker) => Ok(tracker.id),
        None => Err("no active tracker; create one with `tracker add`".into()),
    }
}

/// Parse a start date given as RFC3339 or as a plain `YYYY-MM-DD`
/// (interpreted as midnight UTC).
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = raw.parse::<NaiveDate>() {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(format!("invalid date '{raw}': expected RFC3339 or YYYY-MM-DD").into())
}
