use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the system produces an Event.
/// Operation outcomes carry them; the UI layer subscribes by draining
/// the outcome it triggered rather than through an ambient observer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TrackerCreated {
        tracker_id: String,
        name: String,
        start_date: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    TrackerDeleted {
        tracker_id: String,
        removed_badges: usize,
        at: DateTime<Utc>,
    },
    /// The exactly-one-active flag moved to this tracker.
    ActiveTrackerChanged {
        tracker_id: String,
        at: DateTime<Utc>,
    },
    CheckInRecorded {
        tracker_id: String,
        urges_defeated: u32,
        current_streak: u32,
        at: DateTime<Utc>,
    },
    /// A badge threshold was crossed. `celebratory` is true only for the
    /// single badge surfaced by a progressive unlock; catch-up grants
    /// are silent.
    BadgeUnlocked {
        tracker_id: String,
        badge_id: String,
        milestone_days: u32,
        celebratory: bool,
        at: DateTime<Utc>,
    },
    /// A retroactive date edit moved a held badge back below its
    /// threshold.
    BadgeLocked {
        tracker_id: String,
        badge_id: String,
        milestone_days: u32,
        at: DateTime<Utc>,
    },
    StartDateChanged {
        tracker_id: String,
        old_start: DateTime<Utc>,
        new_start: DateTime<Utc>,
        at: DateTime<Utc>,
    },
}
