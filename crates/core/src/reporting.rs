//! Calendar windows for dashboard and summary aggregation.
//!
//! All windows are half-open `[start, end)` in UTC.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::types::Timestamp;

/// The UTC day containing `now`.
pub fn day_bounds(now: Timestamp) -> (Timestamp, Timestamp) {
    let start = midnight(now.date_naive());
    (start, start + Duration::days(1))
}

/// The UTC calendar month containing `now`.
pub fn month_bounds(now: Timestamp) -> (Timestamp, Timestamp) {
    let first = now.date_naive().with_day(1).unwrap_or_else(|| now.date_naive());
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
    .unwrap_or(first);
    (midnight(first), midnight(next))
}

fn midnight(date: NaiveDate) -> Timestamp {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}
