//! Tracker and unlocked-badge models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::progress::{self, TimeBreakdown};

/// A single quit-target being timed ("sober since" tracker).
///
/// A user may have several trackers; exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracker {
    /// Stable unique identifier, assigned at creation and never reused.
    pub id: String,

    /// Free-text or preset label ("Nicotine", "Alcohol", ...).
    pub name: String,

    /// The "sober since" instant. Mutable: reset and retroactive edits
    /// both rewrite it.
    pub start_date: DateTime<Utc>,

    /// High-water mark of clean days, bumped on check-in.
    pub current_streak: u32,

    /// Whether this is the user's currently displayed tracker.
    pub is_active: bool,

    /// Count of urges the user logged as defeated.
    pub urges_defeated: u32,

    /// When the tracker was created.
    pub created_at: DateTime<Utc>,
}

impl Tracker {
    /// Create a new tracker with a fresh id.
    ///
    /// New trackers start inactive; activation is a separate
    /// transactional flip so exactly one tracker stays active.
    pub fn new(name: impl Into<String>, start_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            start_date,
            current_streak: 0,
            is_active: false,
            urges_defeated: 0,
            created_at: Utc::now(),
        }
    }

    /// Whole clean days elapsed as of `now`. Clamps at zero.
    pub fn days_clean(&self, now: DateTime<Utc>) -> i64 {
        progress::days_clean(self.start_date, now)
    }

    /// Calendar breakdown of the clean span as of `now`.
    pub fn time_breakdown(&self, now: DateTime<Utc>) -> TimeBreakdown {
        progress::time_breakdown(self.start_date, now)
    }

    /// Record a defeated urge: increments the counter and raises the
    /// streak high-water mark to the current clean-day count.
    pub fn record_check_in(&mut self, now: DateTime<Utc>) {
        self.urges_defeated += 1;
        let days = self.days_clean(now);
        self.current_streak = self.current_streak.max(days as u32);
    }
}

/// Join record marking that a tracker holds a given badge.
///
/// At most one record exists per `(tracker_id, badge_id)` pair; the
/// store's upsert and the reconciler's idempotence both enforce this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockedBadge {
    /// Unique record id.
    pub id: String,

    /// Catalog entry this record unlocks.
    pub badge_id: String,

    /// Owning tracker; badges are scoped per tracker, not global.
    pub tracker_id: String,

    /// When the badge was first unlocked. Informational only, never
    /// re-derived from the start date.
    pub unlocked_date: DateTime<Utc>,
}

impl UnlockedBadge {
    pub fn new(
        badge_id: impl Into<String>,
        tracker_id: impl Into<String>,
        unlocked_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            badge_id: badge_id.into(),
            tracker_id: tracker_id.into(),
            unlocked_date,
        }
    }
}
