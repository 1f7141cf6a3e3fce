//! Aggregate queries over a flat record list.
//!
//! Each function re-groups from scratch; use [`super::ProgressSnapshot`]
//! when several figures are needed for the same update.

use chrono::{DateTime, TimeZone, Utc};

use super::grouping::{group_by_day, DayGroup};
use crate::record::SessionRecord;

/// Sum of all counts, saturating at the `i64` bounds; 0 for no records.
pub fn total(records: &[SessionRecord]) -> i64 {
    records.iter().fold(0i64, |acc, r| acc.saturating_add(r.count))
}

/// Record with the earliest date. On equal dates the first one scanned
/// wins. `None` means there is no history yet.
pub fn first_record(records: &[SessionRecord]) -> Option<&SessionRecord> {
    records.iter().min_by_key(|r| r.date)
}

/// Date of the first record, or `now` when there is no history, so that
/// elapsed time since the start comes out as zero.
pub fn history_start(records: &[SessionRecord], now: DateTime<Utc>) -> DateTime<Utc> {
    first_record(records).map(|r| r.date).unwrap_or(now)
}

/// The group for the viewer's current calendar day.
pub fn today_group<Tz: TimeZone>(records: &[SessionRecord], now: &DateTime<Tz>) -> Option<DayGroup> {
    let today = now.date_naive();
    group_by_day(records, &now.timezone())
        .into_vec()
        .into_iter()
        .find(|g| g.day == today)
}

/// Groups lying 2 to 7 days before the viewer's current day.
pub fn last_7_days_groups<Tz: TimeZone>(
    records: &[SessionRecord],
    now: &DateTime<Tz>,
) -> Vec<DayGroup> {
    let groups = group_by_day(records, &now.timezone());
    groups
        .trailing_window(now.date_naive())
        .into_iter()
        .cloned()
        .collect()
}

/// `floor(total / distinct days)`, 0 for no records.
pub fn daily_average<Tz: TimeZone>(records: &[SessionRecord], tz: &Tz) -> i64 {
    group_by_day(records, tz).daily_average()
}

/// Repetitions still needed; negative once the goal is exceeded.
pub fn remaining_to_goal(records: &[SessionRecord], goal: i64) -> i64 {
    goal.saturating_sub(total(records))
}
