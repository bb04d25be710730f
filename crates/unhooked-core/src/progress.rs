//! Elapsed-time calculations for a tracker's clean streak.
//!
//! Both functions are pure: the reference instant (`now`) is always an
//! explicit argument so callers control the clock and tests stay
//! deterministic. A start date in the future clamps to zero rather than
//! producing negative results.

use chrono::{DateTime, Datelike, Months, Utc};
use serde::{Deserialize, Serialize};

/// Calendar breakdown of elapsed time, "1 year, 2 months, 3 days" style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBreakdown {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

/// Whole calendar days elapsed between `start` and `now`.
///
/// This is a civil-date difference, not 24-hour rounding: crossing
/// midnight increments the count even if less than 24 wall-clock hours
/// have passed, and partial days truncate toward the earlier boundary.
/// Future start dates clamp to 0.
pub fn days_clean(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now.date_naive() - start.date_naive()).num_days().max(0)
}

/// Calendar-arithmetic breakdown of the span between `start` and `now`.
///
/// Months are anchored on the start date's day-of-month (clamped at
/// short month ends), so the `days` component never exceeds the length
/// of the month it falls in. Future start dates yield an all-zero
/// breakdown.
pub fn time_breakdown(start: DateTime<Utc>, now: DateTime<Utc>) -> TimeBreakdown {
    if now <= start {
        return TimeBreakdown::default();
    }

    let mut months =
        (now.year() - start.year()) * 12 + now.month() as i32 - start.month() as i32;
    if months > 0 {
        // The raw month count overshoots when `now` hasn't reached the
        // start's day-of-month yet.
        let anchor = start.checked_add_months(Months::new(months as u32));
        if anchor.map_or(true, |a| a > now) {
            months -= 1;
        }
    }
    let months = months.max(0) as u32;
    let anchor = start
        .checked_add_months(Months::new(months))
        .unwrap_or(start);
    let rem = (now - anchor).num_seconds().max(0);

    TimeBreakdown {
        years: months / 12,
        months: months % 12,
        days: (rem / 86_400) as u32,
        hours: (rem % 86_400 / 3_600) as u32,
        minutes: (rem % 3_600 / 60) as u32,
        seconds: (rem % 60) as u32,
    }
}
