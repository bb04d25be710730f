pub mod database;
pub mod migrations;

pub use database::Database;

use std::path::PathBuf;

use crate::error::DatabaseError;
use crate::tracker::{Tracker, UnlockedBadge};

/// Persistence contract the evaluator and reconciler consume.
///
/// Implementations must keep `save_unlocked_badge` idempotent on the
/// `(tracker_id, badge_id)` pair and `delete_tracker` cascading, so no
/// orphaned badge record can outlive its tracker.
pub trait Store {
    fn load_trackers(&self) -> Result<Vec<Tracker>, DatabaseError>;

    fn get_tracker(&self, id: &str) -> Result<Option<Tracker>, DatabaseError>;

    /// Upsert by tracker id.
    fn save_tracker(&self, tracker: &Tracker) -> Result<(), DatabaseError>;

    /// Delete a tracker and every badge record scoped to it, in one
    /// transaction. Returns the number of badge records removed.
    fn delete_tracker(&self, id: &str) -> Result<usize, DatabaseError>;

    /// Transactional flip of the exactly-one-active flag. A missing id
    /// leaves the current active tracker untouched and returns false.
    fn set_active_tracker(&self, id: &str) -> Result<bool, DatabaseError>;

    fn load_unlocked_badges(&self, tracker_id: &str) -> Result<Vec<UnlockedBadge>, DatabaseError>;

    /// Idempotent upsert keyed on `(tracker_id, badge_id)`: re-unlocking
    /// a held badge is a no-op that keeps the original record.
    fn save_unlocked_badge(&self, badge: &UnlockedBadge) -> Result<(), DatabaseError>;

    fn remove_badge(&self, badge_id: &str, tracker_id: &str) -> Result<(), DatabaseError>;
}

/// Returns `~/.config/unhooked[-dev]/` based on UNHOOKED_ENV.
///
/// Set UNHOOKED_ENV=dev to use the development data directory, or
/// UNHOOKED_DATA_DIR to point at an explicit directory (tests use this
/// to stay hermetic).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = if let Ok(explicit) = std::env::var("UNHOOKED_DATA_DIR") {
        PathBuf::from(explicit)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("UNHOOKED_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("unhooked-dev")
        } else {
            base_dir.join("unhooked")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
