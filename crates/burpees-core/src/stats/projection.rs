//! Goal projection: elapsed days, days to deadline, and an estimated
//! finish date from a recent daily rate.
//!
//! All day arithmetic floors toward negative infinity. A projection that
//! would divide by a zero rate is reported as [`Projection::Unavailable`].

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::{history_start, remaining_to_goal};
use super::grouping::{group_by_day, DayGroups};
use crate::record::SessionRecord;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Which daily rate the estimate divides by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Floored daily average over all history.
    AllTime,
    /// Mean of the day sums in the trailing window.
    #[default]
    Rolling7,
}

/// A daily rate kept as an exact ratio `sum / days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRate {
    pub sum: i64,
    pub days: i64,
}

impl DailyRate {
    pub fn is_positive(&self) -> bool {
        self.days > 0 && self.sum > 0
    }

    /// Rate rounded down to whole repetitions per day, 0 when no days.
    pub fn per_day(&self) -> i64 {
        if self.days <= 0 {
            return 0;
        }
        self.sum.div_euclid(self.days)
    }
}

/// Outcome of projecting the remaining repetitions onto the rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "days", rename_all = "snake_case")]
pub enum Projection {
    /// Nothing left to do.
    GoalMet,
    /// No positive recent rate to project with.
    Unavailable,
    /// Whole days still needed at the current rate.
    Days(i64),
}

impl Projection {
    pub fn days(&self) -> Option<i64> {
        match self {
            Projection::Days(n) => Some(*n),
            Projection::GoalMet => Some(0),
            Projection::Unavailable => None,
        }
    }
}

fn floor_days(span: Duration) -> i64 {
    span.num_milliseconds().div_euclid(MS_PER_DAY)
}

/// Whole days since the first record; 0 with no history.
pub fn days_elapsed_since_first(records: &[SessionRecord], now: DateTime<Utc>) -> i64 {
    floor_days(now - history_start(records, now))
}

/// Whole days from `now` until `deadline`; negative once it has passed.
pub fn days_until_deadline<Tz: TimeZone>(deadline: &DateTime<Tz>, now: &DateTime<Tz>) -> i64 {
    floor_days(deadline.clone().signed_duration_since(now.clone()))
}

/// Daily rate from already-grouped days.
pub fn rate_from_groups(
    groups: &DayGroups,
    today: chrono::NaiveDate,
    source: RateSource,
) -> DailyRate {
    match source {
        RateSource::AllTime => DailyRate {
            sum: groups.daily_average(),
            days: 1,
        },
        RateSource::Rolling7 => {
            let window = groups.trailing_window(today);
            DailyRate {
                sum: window.iter().fold(0i64, |acc, g| acc.saturating_add(g.sum)),
                days: window.len() as i64,
            }
        }
    }
}

/// Daily rate the estimate is based on, evaluated in the viewer's zone.
pub fn recent_daily_rate<Tz: TimeZone>(
    records: &[SessionRecord],
    now: &DateTime<Tz>,
    source: RateSource,
) -> DailyRate {
    let groups = group_by_day(records, &now.timezone());
    rate_from_groups(&groups, now.date_naive(), source)
}

/// Project `remaining` repetitions onto `rate`.
pub fn project(remaining: i64, rate: DailyRate) -> Projection {
    if remaining <= 0 {
        return Projection::GoalMet;
    }
    if !rate.is_positive() {
        return Projection::Unavailable;
    }
    // floor(remaining / (sum / days)) without leaving integers.
    let days = (remaining as i128 * rate.days as i128).div_euclid(rate.sum as i128);
    Projection::Days(i64::try_from(days).unwrap_or(i64::MAX))
}

/// Whole days still needed to reach `goal` at the recent rate.
pub fn estimated_days_remaining<Tz: TimeZone>(
    records: &[SessionRecord],
    goal: i64,
    now: &DateTime<Tz>,
    source: RateSource,
) -> Projection {
    let rate = recent_daily_rate(records, now, source);
    let projection = project(remaining_to_goal(records, goal), rate);
    tracing::debug!(?rate, ?projection, "projected goal completion");
    projection
}

/// `now` plus the projected days; `None` when no projection is possible.
pub fn estimated_finish_date<Tz: TimeZone>(
    projection: Projection,
    now: &DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    let days = projection.days()?;
    now.clone().checked_add_signed(Duration::try_days(days)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-06-15T12:00:00-05:00").unwrap()
    }

    fn days_ago(days: i64, count: i64) -> SessionRecord {
        SessionRecord::draft(count, (now() - Duration::days(days)).with_timezone(&Utc))
    }

    #[test]
    fn elapsed_days_floor() {
        let n = now().with_timezone(&Utc);
        let records = vec![SessionRecord::draft(1, n - Duration::hours(47))];
        assert_eq!(days_elapsed_since_first(&records, n), 1);
        assert_eq!(days_elapsed_since_first(&[], n), 0);
    }

    #[test]
    fn deadline_can_be_negative() {
        let n = now();
        assert_eq!(days_until_deadline(&(n + Duration::hours(36)), &n), 1);
        assert_eq!(days_until_deadline(&(n - Duration::hours(1)), &n), -1);
        assert_eq!(days_until_deadline(&n, &n), 0);
    }

    #[test]
    fn rolling_rate_uses_window_mean() {
        let records = vec![days_ago(0, 100), days_ago(2, 10), days_ago(3, 20)];
        let rate = recent_daily_rate(&records, &now(), RateSource::Rolling7);
        assert_eq!(rate, DailyRate { sum: 30, days: 2 });
        assert_eq!(rate.per_day(), 15);
    }

    #[test]
    fn all_time_rate_uses_floored_average() {
        let records = vec![days_ago(0, 10), days_ago(1, 11)];
        let rate = recent_daily_rate(&records, &now(), RateSource::AllTime);
        assert_eq!(rate.per_day(), 10);
    }

    #[test]
    fn estimate_divides_remaining_by_rate() {
        // Window: 10 + 20 over 2 days = 15/day. Total 30, goal 100, 70 left.
        let records = vec![days_ago(2, 10), days_ago(3, 20)];
        let p = estimated_days_remaining(&records, 100, &now(), RateSource::Rolling7);
        assert_eq!(p, Projection::Days(4));
    }

    #[test]
    fn estimate_unavailable_without_window_sessions() {
        let records = vec![days_ago(0, 10), days_ago(8, 20)];
        let p = estimated_days_remaining(&records, 100, &now(), RateSource::Rolling7);
        assert_eq!(p, Projection::Unavailable);
        assert_eq!(estimated_finish_date(p, &now()), None);
        assert_eq!(
            estimated_days_remaining(&[], 100, &now(), RateSource::AllTime),
            Projection::Unavailable
        );
    }

    #[test]
    fn estimate_reports_goal_met_before_dividing() {
        let records = vec![days_ago(0, 120)];
        let p = estimated_days_remaining(&records, 100, &now(), RateSource::Rolling7);
        assert_eq!(p, Projection::GoalMet);
        assert_eq!(estimated_finish_date(p, &now()), Some(now()));
    }

    #[test]
    fn zero_count_window_is_unavailable() {
        let records = vec![days_ago(2, 0), days_ago(3, 0)];
        let p = estimated_days_remaining(&records, 100, &now(), RateSource::Rolling7);
        assert_eq!(p, Projection::Unavailable);
    }

    #[test]
    fn finish_date_adds_whole_days() {
        let p = Projection::Days(3);
        assert_eq!(estimated_finish_date(p, &now()), Some(now() + Duration::days(3)));
    }

    #[test]
    fn projection_serializes_with_status_tag() {
        let json = serde_json::to_value(Projection::Days(4)).unwrap();
        assert_eq!(json["status"], "days");
        assert_eq!(json["days"], 4);
        let json = serde_json::to_value(Projection::Unavailable).unwrap();
        assert_eq!(json["status"], "unavailable");
    }
}
