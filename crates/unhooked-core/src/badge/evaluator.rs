//! Pure badge unlock-status queries.
//!
//! Every function here is a read-only computation over the catalog, a
//! tracker's clean-day count, and its unlocked-badge records. Nothing
//! in this module mutates state; the reconciler owns all writes.
//!
//! Tie-break policy for catalog entries sharing `milestone_days` (not
//! expected in the built-in set, but handled): descending queries
//! prefer later catalog insertion order, ascending queries earlier.

use crate::badge::catalog::{BadgeDefinition, Catalog};
use crate::tracker::UnlockedBadge;

/// True iff an unlocked record exists matching both keys.
pub fn is_unlocked(badge_id: &str, tracker_id: &str, unlocked: &[UnlockedBadge]) -> bool {
    unlocked
        .iter()
        .any(|u| u.badge_id == badge_id && u.tracker_id == tracker_id)
}

/// The unlocked catalog entry with the greatest `milestone_days` for
/// this tracker, or `None` if nothing is unlocked yet.
pub fn highest_unlocked_badge<'a>(
    catalog: &'a Catalog,
    tracker_id: &str,
    unlocked: &[UnlockedBadge],
) -> Option<&'a BadgeDefinition> {
    let mut best: Option<&BadgeDefinition> = None;
    for def in catalog.iter() {
        if is_unlocked(&def.id, tracker_id, unlocked)
            && best.map_or(true, |b| def.milestone_days >= b.milestone_days)
        {
            best = Some(def);
        }
    }
    best
}

/// The next badge still ahead of the tracker: smallest `milestone_days`
/// strictly above `days_clean` that isn't already unlocked. `None` when
/// the catalog is exhausted.
pub fn next_milestone_badge<'a>(
    catalog: &'a Catalog,
    days_clean: i64,
    tracker_id: &str,
    unlocked: &[UnlockedBadge],
) -> Option<&'a BadgeDefinition> {
    let mut best: Option<&BadgeDefinition> = None;
    for def in catalog.iter() {
        if i64::from(def.milestone_days) > days_clean
            && !is_unlocked(&def.id, tracker_id, unlocked)
            && best.map_or(true, |b| def.milestone_days < b.milestone_days)
        {
            best = Some(def);
        }
    }
    best
}

/// The highest-value badge the tracker has earned but not yet been
/// shown: greatest `milestone_days` at or below `days_clean` without an
/// unlocked record. Skipped intermediate milestones collapse into this
/// single highest tier.
pub fn first_newly_due_badge<'a>(
    catalog: &'a Catalog,
    days_clean: i64,
    tracker_id: &str,
    unlocked: &[UnlockedBadge],
) -> Option<&'a BadgeDefinition> {
    let mut best: Option<&BadgeDefinition> = None;
    for def in catalog.iter() {
        if i64::from(def.milestone_days) <= days_clean
            && !is_unlocked(&def.id, tracker_id, unlocked)
            && best.map_or(true, |b| def.milestone_days >= b.milestone_days)
        {
            best = Some(def);
        }
    }
    best
}

/// All earned-but-unrecorded badges, ascending by `milestone_days`.
/// This is the bulk catch-up set.
pub fn missing_badges<'a>(
    catalog: &'a Catalog,
    days_clean: i64,
    tracker_id: &str,
    unlocked: &[UnlockedBadge],
) -> Vec<&'a BadgeDefinition> {
    let mut due: Vec<&BadgeDefinition> = catalog
        .iter()
        .filter(|def| {
            i64::from(def.milestone_days) <= days_clean
                && !is_unlocked(&def.id, tracker_id, unlocked)
        })
        .collect();
    due.sort_by_key(|def| def.milestone_days);
    due
}
