//! Badge state reconciliation.
//!
//! The reconciler is the only component that mutates unlocked-badge
//! state. Every operation is idempotent: running it twice with
//! unchanged inputs produces no additional side effects. Operations
//! take `&mut self`, so a shared reconciler cannot interleave two
//! reconciliations for the same store; hosts that fan out across
//! threads wrap it in a mutex.
//!
//! A store write failure surfaces as `Err` before any in-memory view
//! runs ahead of durable state; the next sync self-heals whatever the
//! failed call didn't persist.

use chrono::{DateTime, Utc};

use crate::badge::catalog::{BadgeDefinition, Catalog};
use crate::badge::evaluator;
use crate::error::Result;
use crate::events::Event;
use crate::store::Store;
use crate::tracker::UnlockedBadge;

/// Result of a catch-up sync: the badges granted, in ascending
/// milestone order, plus the events they produced.
#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
    pub unlocked: Vec<BadgeDefinition>,
    pub events: Vec<Event>,
}

/// Result of a date-edit reconciliation. Locks always precede unlocks.
#[derive(Debug, Clone, Default)]
pub struct DateEditOutcome {
    pub locked: Vec<BadgeDefinition>,
    pub unlocked: Vec<BadgeDefinition>,
    pub events: Vec<Event>,
}

/// Synchronizes persisted badge records against a tracker's current
/// elapsed time.
pub struct Reconciler<S: Store> {
    store: S,
    catalog: Catalog,
}

impl<S: Store> Reconciler<S> {
    pub fn new(store: S, catalog: Catalog) -> Self {
        Self { store, catalog }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the reconciler, handing the store back. Used when the
    /// catalog changes (app upgrade) and the engine is rebuilt over the
    /// same store.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Bulk catch-up: grant every badge the elapsed time already
    /// qualifies for, with `unlocked_date = now` (never backdated to the
    /// historical crossing).
    ///
    /// Invoked at launch/foreground and after creating a tracker with a
    /// backdated start date. Grants are silent; no celebratory badge is
    /// surfaced. A missing tracker is a no-op.
    pub fn catch_up_sync(&mut self, tracker_id: &str, now: DateTime<Utc>) -> Result<SyncOutcome> {
        let Some(tracker) = self.store.get_tracker(tracker_id)? else {
            return Ok(SyncOutcome::default());
        };
        let records = self.store.load_unlocked_badges(tracker_id)?;
        let days = tracker.days_clean(now);

        let mut outcome = SyncOutcome::default();
        for def in evaluator::missing_badges(&self.catalog, days, tracker_id, &records) {
            self.store
                .save_unlocked_badge(&UnlockedBadge::new(&def.id, tracker_id, now))?;
            outcome.events.push(Event::BadgeUnlocked {
                tracker_id: tracker_id.to_string(),
                badge_id: def.id.clone(),
                milestone_days: def.milestone_days,
                celebratory: false,
                at: now,
            });
            outcome.unlocked.push(def.clone());
        }
        Ok(outcome)
    }

    /// Single-badge unlock for explicit user actions (check-in, urge
    /// defeated).
    ///
    /// Unlocks and returns only the highest newly-due badge. When
    /// several tiers were skipped in one elapsed-time jump, the lower
    /// ones stay locked here and are backfilled silently by the next
    /// catch-up sync, so the user sees exactly one celebration.
    pub fn progressive_unlock(
        &mut self,
        tracker_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<BadgeDefinition>> {
        let Some(tracker) = self.store.get_tracker(tracker_id)? else {
            return Ok(None);
        };
        let records = self.store.load_unlocked_badges(tracker_id)?;
        let days = tracker.days_clean(now);

        let Some(def) =
            evaluator::first_newly_due_badge(&self.catalog, days, tracker_id, &records)
        else {
            return Ok(None);
        };
        let def = def.clone();
        self.store
            .save_unlocked_badge(&UnlockedBadge::new(&def.id, tracker_id, now))?;
        Ok(Some(def))
    }

    /// Reconcile after a retroactive start-date edit.
    ///
    /// Persists the new start date, then locks every held badge whose
    /// threshold now exceeds the recomputed clean-day count, then runs
    /// catch-up for anything newly qualifying. Locking runs first so a
    /// badge at the boundary is evaluated exactly once against the
    /// final count and no reader of intermediate state sees a badge
    /// both locked and re-unlocked in one pass.
    pub fn edit_start_date(
        &mut self,
        tracker_id: &str,
        new_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<DateEditOutcome> {
        let Some(mut tracker) = self.store.get_tracker(tracker_id)? else {
            return Ok(DateEditOutcome::default());
        };
        let old_start = tracker.start_date;
        tracker.start_date = new_start;
        self.store.save_tracker(&tracker)?;

        let mut outcome = DateEditOutcome::default();
        outcome.events.push(Event::StartDateChanged {
            tracker_id: tracker_id.to_string(),
            old_start,
            new_start,
            at: now,
        });

        let days = tracker.days_clean(now);
        for record in self.store.load_unlocked_badges(tracker_id)? {
            // Records for ids no longer in the catalog are left alone;
            // reconciliation is catalog-version-agnostic.
            let Some(def) = self.catalog.get(&record.badge_id) else {
                continue;
            };
            if i64::from(def.milestone_days) > days {
                let def = def.clone();
                self.store.remove_badge(&record.badge_id, tracker_id)?;
                outcome.events.push(Event::BadgeLocked {
                    tracker_id: tracker_id.to_string(),
                    badge_id: def.id.clone(),
                    milestone_days: def.milestone_days,
                    at: now,
                });
                outcome.locked.push(def);
            }
        }

        let sync = self.catch_up_sync(tracker_id, now)?;
        outcome.unlocked = sync.unlocked;
        outcome.events.extend(sync.events);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Database;
    use crate::tracker::Tracker;
    use chrono::Duration;

    fn setup(days_ago: i64) -> (Reconciler<Database>, String, DateTime<Utc>) {
        let now = Utc::now();
        let db = Database::open_memory().unwrap();
        let tracker = Tracker::new("Nicotine", now - Duration::days(days_ago));
        let id = tracker.id.clone();
        db.save_tracker(&tracker).unwrap();
        (Reconciler::new(db, Catalog::builtin()), id, now)
    }

    fn unlocked_ids(rec: &Reconciler<Database>, id: &str) -> Vec<String> {
        let mut ids: Vec<String> = rec
            .store()
            .load_unlocked_badges(id)
            .unwrap()
            .into_iter()
            .map(|b| b.badge_id)
            .collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_catch_up_grants_all_due_badges() {
        let (mut rec, id, now) = setup(10);
        let outcome = rec.catch_up_sync(&id, now).unwrap();
        let ids: Vec<&str> = outcome.unlocked.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["day0", "day1", "day3", "day7"]);
    }

    #[test]
    fn test_catch_up_is_idempotent() {
        let (mut rec, id, now) = setup(10);
        rec.catch_up_sync(&id, now).unwrap();
        let before = unlocked_ids(&rec, &id);

        let second = rec.catch_up_sync(&id, now).unwrap();
        assert!(second.unlocked.is_empty());
        assert!(second.events.is_empty());
        assert_eq!(unlocked_ids(&rec, &id), before);
    }

    #[test]
    fn test_catch_up_missing_tracker_is_noop() {
        let (mut rec, _, now) = setup(10);
        let outcome = rec.catch_up_sync("nope", now).unwrap();
        assert!(outcome.unlocked.is_empty());
    }

    #[test]
    fn test_catch_up_grants_are_not_backdated() {
        let (mut rec, id, now) = setup(100);
        rec.catch_up_sync(&id, now).unwrap();
        for badge in rec.store().load_unlocked_badges(&id).unwrap() {
            assert_eq!(badge.unlocked_date.timestamp(), now.timestamp());
        }
    }

    #[test]
    fn test_progressive_unlock_reports_highest_tier_only() {
        // 7, 14 and 30 all newly crossed; only day30 is unlocked here.
        let (mut rec, id, now) = setup(35);
        let celebrated = rec.progressive_unlock(&id, now).unwrap().unwrap();
        assert_eq!(celebrated.id, "day30");
        assert_eq!(unlocked_ids(&rec, &id), vec!["day30"]);

        // The following catch-up backfills the skipped tiers silently.
        let sync = rec.catch_up_sync(&id, now).unwrap();
        let backfilled: Vec<&str> = sync.unlocked.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(backfilled, vec!["day0", "day1", "day3", "day7", "day14"]);
    }

    #[test]
    fn test_progressive_unlock_none_when_current() {
        let (mut rec, id, now) = setup(10);
        rec.catch_up_sync(&id, now).unwrap();
        assert!(rec.progressive_unlock(&id, now).unwrap().is_none());
    }

    #[test]
    fn test_progressive_unlock_missing_tracker_is_noop() {
        let (mut rec, _, now) = setup(10);
        assert!(rec.progressive_unlock("nope", now).unwrap().is_none());
    }

    #[test]
    fn test_date_edit_locks_then_backfills() {
        let (mut rec, id, now) = setup(10);
        rec.catch_up_sync(&id, now).unwrap();
        assert_eq!(unlocked_ids(&rec, &id), vec!["day0", "day1", "day3", "day7"]);

        // Move the start forward: only 5 clean days remain.
        let outcome = rec
            .edit_start_date(&id, now - Duration::days(5), now)
            .unwrap();
        let locked: Vec<&str> = outcome.locked.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(locked, vec!["day7"]);
        assert!(outcome.unlocked.is_empty());
        assert_eq!(unlocked_ids(&rec, &id), vec!["day0", "day1", "day3"]);
    }

    #[test]
    fn test_date_edit_backdating_grants_more() {
        let (mut rec, id, now) = setup(2);
        rec.catch_up_sync(&id, now).unwrap();

        let outcome = rec
            .edit_start_date(&id, now - Duration::days(40), now)
            .unwrap();
        assert!(outcome.locked.is_empty());
        let granted: Vec<&str> = outcome.unlocked.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(granted, vec!["day3", "day7", "day14", "day30"]);
    }

    #[test]
    fn test_date_edit_boundary_badge_survives() {
        let (mut rec, id, now) = setup(10);
        rec.catch_up_sync(&id, now).unwrap();

        // Exactly 7 clean days: day7 sits on the boundary and stays.
        let outcome = rec
            .edit_start_date(&id, now - Duration::days(7), now)
            .unwrap();
        assert!(outcome.locked.is_empty());
        assert!(outcome.unlocked.is_empty());
        assert_eq!(unlocked_ids(&rec, &id), vec!["day0", "day1", "day3", "day7"]);
    }

    #[test]
    fn test_date_edit_persists_new_start() {
        let (mut rec, id, now) = setup(10);
        let new_start = now - Duration::days(5);
        rec.edit_start_date(&id, new_start, now).unwrap();
        let tracker = rec.store().get_tracker(&id).unwrap().unwrap();
        assert_eq!(tracker.start_date.timestamp(), new_start.timestamp());
    }

    #[test]
    fn test_date_edit_missing_tracker_is_noop() {
        let (mut rec, _, now) = setup(10);
        let outcome = rec.edit_start_date("nope", now, now).unwrap();
        assert!(outcome.locked.is_empty() && outcome.unlocked.is_empty());
    }

    #[test]
    fn test_unknown_badge_records_left_alone() {
        // A record from a catalog version that no longer ships.
        let (mut rec, id, now) = setup(10);
        rec.store()
            .save_unlocked_badge(&UnlockedBadge::new("retired_tier", &id, now))
            .unwrap();

        rec.edit_start_date(&id, now - Duration::days(1), now).unwrap();
        assert!(unlocked_ids(&rec, &id).contains(&"retired_tier".to_string()));
    }

    #[test]
    fn test_scoping_between_trackers() {
        let now = Utc::now();
        let db = Database::open_memory().unwrap();
        let a = Tracker::new("A", now - Duration::days(30));
        let b = Tracker::new("B", now - Duration::days(1));
        let (a_id, b_id) = (a.id.clone(), b.id.clone());
        db.save_tracker(&a).unwrap();
        db.save_tracker(&b).unwrap();

        let mut rec = Reconciler::new(db, Catalog::builtin());
        rec.catch_up_sync(&a_id, now).unwrap();
        assert_eq!(unlocked_ids(&rec, &b_id), Vec::<String>::new());

        rec.catch_up_sync(&b_id, now).unwrap();
        assert_eq!(unlocked_ids(&rec, &b_id), vec!["day0", "day1"]);
    }
}
