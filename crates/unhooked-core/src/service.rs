//! Tracker service: the operation surface the UI layer calls.
//!
//! Owns the reconciler (and through it the store) as an explicitly
//! constructed, injectable service. No ambient globals: a running app
//! holds one instance and passes it to whatever drives the call path.

use chrono::{DateTime, Utc};

use crate::badge::catalog::{BadgeDefinition, Catalog};
use crate::badge::evaluator;
use crate::badge::reconciler::{DateEditOutcome, Reconciler, SyncOutcome};
use crate::error::Result;
use crate::events::Event;
use crate::progress::TimeBreakdown;
use crate::store::Store;
use crate::tracker::Tracker;

/// Read-only snapshot of one tracker's progress for display.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub tracker: Tracker,
    pub days_clean: i64,
    pub breakdown: TimeBreakdown,
    pub unlocked_count: usize,
    pub highest_badge: Option<BadgeDefinition>,
    pub next_milestone: Option<BadgeDefinition>,
}

/// Result of a check-in: updated counters plus at most one celebratory
/// badge for the UI to display.
#[derive(Debug, Clone)]
pub struct CheckInOutcome {
    pub tracker: Tracker,
    pub celebrated: Option<BadgeDefinition>,
    pub events: Vec<Event>,
}

pub struct TrackerService<S: Store> {
    reconciler: Reconciler<S>,
}

impl<S: Store> TrackerService<S> {
    pub fn new(store: S, catalog: Catalog) -> Self {
        Self {
            reconciler: Reconciler::new(store, catalog),
        }
    }

    pub fn store(&self) -> &S {
        self.reconciler.store()
    }

    /// Consume the service, handing the store back.
    pub fn into_store(self) -> S {
        self.reconciler.into_store()
    }

    pub fn catalog(&self) -> &Catalog {
        self.reconciler.catalog()
    }

    /// Create a tracker. The first tracker becomes active automatically.
    /// A backdated start date immediately grants every badge already
    /// earned via catch-up sync.
    pub fn create_tracker(
        &mut self,
        name: impl Into<String>,
        start_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(Tracker, SyncOutcome)> {
        let mut tracker = Tracker::new(name, start_date);
        tracker.is_active = self.store().load_trackers()?.is_empty();
        self.reconciler.store().save_tracker(&tracker)?;

        let mut sync = self.reconciler.catch_up_sync(&tracker.id, now)?;
        sync.events.insert(
            0,
            Event::TrackerCreated {
                tracker_id: tracker.id.clone(),
                name: tracker.name.clone(),
                start_date,
                at: now,
            },
        );
        Ok((tracker, sync))
    }

    /// Delete a tracker, cascading over its badge records. If the
    /// deleted tracker was active, the oldest remaining one takes over
    /// so exactly one stays active while any exist.
    pub fn delete_tracker(&mut self, tracker_id: &str, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let Some(tracker) = self.store().get_tracker(tracker_id)? else {
            return Ok(Vec::new());
        };
        let removed = self.store().delete_tracker(tracker_id)?;
        let mut events = vec![Event::TrackerDeleted {
            tracker_id: tracker_id.to_string(),
            removed_badges: removed,
            at: now,
        }];

        if tracker.is_active {
            if let Some(next) = self.store().load_trackers()?.into_iter().next() {
                self.store().set_active_tracker(&next.id)?;
                events.push(Event::ActiveTrackerChanged {
                    tracker_id: next.id,
                    at: now,
                });
            }
        }
        Ok(events)
    }

    /// Flip the active flag to the given tracker. Returns false (and
    /// changes nothing) for an unknown id.
    pub fn switch_active(&mut self, tracker_id: &str) -> Result<bool> {
        Ok(self.store().set_active_tracker(tracker_id)?)
    }

    pub fn active_tracker(&self) -> Result<Option<Tracker>> {
        Ok(self
            .store()
            .load_trackers()?
            .into_iter()
            .find(|t| t.is_active))
    }

    /// Record a defeated urge: bump counters, persist, then run a
    /// progressive unlock. Returns `None` for an unknown tracker.
    pub fn check_in(
        &mut self,
        tracker_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<CheckInOutcome>> {
        let Some(mut tracker) = self.store().get_tracker(tracker_id)? else {
            return Ok(None);
        };
        tracker.record_check_in(now);
        self.store().save_tracker(&tracker)?;

        let mut events = vec![Event::CheckInRecorded {
            tracker_id: tracker_id.to_string(),
            urges_defeated: tracker.urges_defeated,
            current_streak: tracker.current_streak,
            at: now,
        }];

        let celebrated = self.reconciler.progressive_unlock(tracker_id, now)?;
        if let Some(def) = &celebrated {
            events.push(Event::BadgeUnlocked {
                tracker_id: tracker_id.to_string(),
                badge_id: def.id.clone(),
                milestone_days: def.milestone_days,
                celebratory: true,
                at: now,
            });
        }
        Ok(Some(CheckInOutcome {
            tracker,
            celebrated,
            events,
        }))
    }

    /// Catch-up sync for one tracker (launch/foreground path).
    pub fn sync(&mut self, tracker_id: &str, now: DateTime<Utc>) -> Result<SyncOutcome> {
        self.reconciler.catch_up_sync(tracker_id, now)
    }

    /// Catch-up sync across every tracker.
    pub fn sync_all(&mut self, now: DateTime<Utc>) -> Result<Vec<SyncOutcome>> {
        let ids: Vec<String> = self
            .store()
            .load_trackers()?
            .into_iter()
            .map(|t| t.id)
            .collect();
        ids.into_iter()
            .map(|id| self.reconciler.catch_up_sync(&id, now))
            .collect()
    }

    /// Retroactive start-date edit.
    pub fn edit_start_date(
        &mut self,
        tracker_id: &str,
        new_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<DateEditOutcome> {
        self.reconciler.edit_start_date(tracker_id, new_start, now)
    }

    /// Start over today: reset the start date to `now` and reconcile.
    pub fn reset(&mut self, tracker_id: &str, now: DateTime<Utc>) -> Result<DateEditOutcome> {
        self.reconciler.edit_start_date(tracker_id, now, now)
    }

    /// Display snapshot for one tracker. Returns `None` for an unknown
    /// id rather than erroring.
    pub fn status(&self, tracker_id: &str, now: DateTime<Utc>) -> Result<Option<StatusSnapshot>> {
        let Some(tracker) = self.store().get_tracker(tracker_id)? else {
            return Ok(None);
        };
        let records = self.store().load_unlocked_badges(tracker_id)?;
        let days = tracker.days_clean(now);
        let catalog = self.catalog();

        Ok(Some(StatusSnapshot {
            days_clean: days,
            breakdown: tracker.time_breakdown(now),
            unlocked_count: records.len(),
            highest_badge: evaluator::highest_unlocked_badge(catalog, tracker_id, &records)
                .cloned(),
            next_milestone: evaluator::next_milestone_badge(catalog, days, tracker_id, &records)
                .cloned(),
            tracker,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Database;
    use chrono::Duration;

    fn service() -> TrackerService<Database> {
        TrackerService::new(Database::open_memory().unwrap(), Catalog::builtin())
    }

    #[test]
    fn test_first_tracker_becomes_active() {
        let mut svc = service();
        let now = Utc::now();
        let (a, _) = svc.create_tracker("A", now, now).unwrap();
        let (b, _) = svc.create_tracker("B", now, now).unwrap();
        assert!(a.is_active);
        assert!(!b.is_active);
        assert_eq!(svc.active_tracker().unwrap().unwrap().id, a.id);
    }

    #[test]
    fn test_backdated_create_grants_immediately() {
        let mut svc = service();
        let now = Utc::now();
        let (_, sync) = svc
            .create_tracker("Nicotine", now - Duration::days(10), now)
            .unwrap();
        let ids: Vec<&str> = sync.unlocked.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["day0", "day1", "day3", "day7"]);
    }

    #[test]
    fn test_check_in_updates_counters_and_celebrates() {
        let mut svc = service();
        let now = Utc::now();
        let (t, _) = svc
            .create_tracker("Nicotine", now - Duration::days(8), now)
            .unwrap();

        let outcome = svc.check_in(&t.id, now).unwrap().unwrap();
        assert_eq!(outcome.tracker.urges_defeated, 1);
        assert_eq!(outcome.tracker.current_streak, 8);
        assert_eq!(outcome.celebrated.unwrap().id, "day7");
    }

    #[test]
    fn test_check_in_after_sync_has_no_celebration() {
        let mut svc = service();
        let now = Utc::now();
        let (t, _) = svc
            .create_tracker("Nicotine", now - Duration::days(8), now)
            .unwrap();
        svc.sync(&t.id, now).unwrap();

        let outcome = svc.check_in(&t.id, now).unwrap().unwrap();
        assert!(outcome.celebrated.is_none());
        assert_eq!(outcome.tracker.urges_defeated, 1);
    }

    #[test]
    fn test_check_in_unknown_tracker_is_none() {
        let mut svc = service();
        assert!(svc.check_in("nope", Utc::now()).unwrap().is_none());
    }

    #[test]
    fn test_delete_active_promotes_next() {
        let mut svc = service();
        let now = Utc::now();
        let (a, _) = svc.create_tracker("A", now, now).unwrap();
        let (b, _) = svc.create_tracker("B", now, now).unwrap();

        let events = svc.delete_tracker(&a.id, now).unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::ActiveTrackerChanged { tracker_id, .. } if *tracker_id == b.id)));
        assert_eq!(svc.active_tracker().unwrap().unwrap().id, b.id);
    }

    #[test]
    fn test_delete_cascades_badges() {
        let mut svc = service();
        let now = Utc::now();
        let (t, _) = svc
            .create_tracker("Nicotine", now - Duration::days(30), now)
            .unwrap();
        assert!(!svc.store().load_unlocked_badges(&t.id).unwrap().is_empty());

        svc.delete_tracker(&t.id, now).unwrap();
        assert!(svc.store().load_unlocked_badges(&t.id).unwrap().is_empty());
        assert!(svc.store().get_tracker(&t.id).unwrap().is_none());
    }

    #[test]
    fn test_reset_relocks_everything_but_day_zero() {
        let mut svc = service();
        let now = Utc::now();
        let (t, _) = svc
            .create_tracker("Nicotine", now - Duration::days(30), now)
            .unwrap();

        let outcome = svc.reset(&t.id, now).unwrap();
        let mut locked: Vec<(u32, &str)> = outcome
            .locked
            .iter()
            .map(|d| (d.milestone_days, d.id.as_str()))
            .collect();
        locked.sort();
        let locked: Vec<&str> = locked.into_iter().map(|(_, id)| id).collect();
        assert_eq!(locked, vec!["day1", "day3", "day7", "day14", "day30"]);

        let status = svc.status(&t.id, now).unwrap().unwrap();
        assert_eq!(status.days_clean, 0);
        assert_eq!(status.highest_badge.unwrap().id, "day0");
        assert_eq!(status.next_milestone.unwrap().id, "day1");
    }

    #[test]
    fn test_status_snapshot() {
        let mut svc = service();
        let now = Utc::now();
        let (t, _) = svc
            .create_tracker("Nicotine", now - Duration::days(10), now)
            .unwrap();

        let status = svc.status(&t.id, now).unwrap().unwrap();
        assert_eq!(status.days_clean, 10);
        assert_eq!(status.unlocked_count, 4);
        assert_eq!(status.highest_badge.unwrap().id, "day7");
        assert_eq!(status.next_milestone.unwrap().id, "day14");
        assert!(svc.status("nope", now).unwrap().is_none());
    }

    #[test]
    fn test_sync_all_covers_every_tracker() {
        let mut svc = service();
        let now = Utc::now();
        // Bypass create_tracker's immediate sync to leave both behind.
        let a = Tracker::new("A", now - Duration::days(7));
        let b = Tracker::new("B", now - Duration::days(1));
        svc.store().save_tracker(&a).unwrap();
        svc.store().save_tracker(&b).unwrap();

        let outcomes = svc.sync_all(now).unwrap();
        let total: usize = outcomes.iter().map(|o| o.unlocked.len()).sum();
        assert_eq!(total, 4 + 2);
    }
}
