//! Grouping of session records by calendar day.
//!
//! Day keys are [`NaiveDate`] values taken in the viewer's time zone at
//! evaluation time, so the same records can group differently for
//! viewers in different zones or across a DST change.

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::record::SessionRecord;

/// Days before today that the trailing window starts and ends at.
/// Today and yesterday are excluded, the six days before that included.
pub const TRAILING_WINDOW_NEAREST: i64 = 2;
pub const TRAILING_WINDOW_FARTHEST: i64 = 7;

/// All records sharing one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub sum: i64,
    pub records: Vec<SessionRecord>,
}

impl DayGroup {
    fn seed(day: NaiveDate, record: &SessionRecord) -> Self {
        Self {
            day,
            sum: record.count,
            records: vec![record.clone()],
        }
    }

    fn push(&mut self, record: &SessionRecord) {
        self.sum = self.sum.saturating_add(record.count);
        self.records.push(record.clone());
    }
}

/// Day groups in first-seen order of their day keys.
///
/// Built once per update by [`group_by_day`]; every group-level query
/// reads from the same pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayGroups(Vec<DayGroup>);

impl DayGroups {
    pub fn as_slice(&self) -> &[DayGroup] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<DayGroup> {
        self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DayGroup> {
        self.0.iter()
    }

    /// Number of distinct days.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum over every group, saturating at the `i64` bounds.
    pub fn total(&self) -> i64 {
        self.0.iter().fold(0i64, |acc, g| acc.saturating_add(g.sum))
    }

    /// The group for `today`, if anything was recorded on it.
    pub fn today(&self, today: NaiveDate) -> Option<&DayGroup> {
        self.0.iter().find(|g| g.day == today)
    }

    /// Groups whose day lies 2 to 7 days before `today`, in group order.
    pub fn trailing_window(&self, today: NaiveDate) -> Vec<&DayGroup> {
        self.0
            .iter()
            .filter(|g| {
                let offset = (today - g.day).num_days();
                (TRAILING_WINDOW_NEAREST..=TRAILING_WINDOW_FARTHEST).contains(&offset)
            })
            .collect()
    }

    /// `floor(total / distinct days)`, 0 when there are no groups.
    pub fn daily_average(&self) -> i64 {
        if self.0.is_empty() {
            return 0;
        }
        self.total().div_euclid(self.0.len() as i64)
    }
}

impl<'a> IntoIterator for &'a DayGroups {
    type Item = &'a DayGroup;
    type IntoIter = std::slice::Iter<'a, DayGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Calendar day of `record` in `tz`.
pub fn day_key<Tz: TimeZone>(record: &SessionRecord, tz: &Tz) -> NaiveDate {
    record.date.with_timezone(tz).date_naive()
}

/// Partition `records` by local calendar day.
///
/// Groups appear in the order their day was first seen; records keep
/// their input order within a group. Counts are summed as-is.
pub fn group_by_day<Tz: TimeZone>(records: &[SessionRecord], tz: &Tz) -> DayGroups {
    let mut groups: Vec<DayGroup> = Vec::new();
    for record in records {
        let day = day_key(record, tz);
        match groups.iter_mut().find(|g| g.day == day) {
            Some(group) => group.push(record),
            None => groups.push(DayGroup::seed(day, record)),
        }
    }
    tracing::debug!(records = records.len(), days = groups.len(), "grouped records by day");
    DayGroups(groups)
}
