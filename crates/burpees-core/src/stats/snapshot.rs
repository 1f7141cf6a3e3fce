//! Everything the progress page shows, derived from one grouping pass.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::total;
use super::grouping::{group_by_day, DayGroups};
use super::projection::{
    days_elapsed_since_first, days_until_deadline, estimated_finish_date, project,
    rate_from_groups, DailyRate, Projection, RateSource,
};
use crate::goal::Goal;
use crate::progress::ProgressBar;
use crate::record::SessionRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub today: NaiveDate,
    pub today_sum: i64,
    pub total: i64,
    pub days_recorded: usize,
    pub daily_average: i64,
    pub remaining: i64,
    pub days_elapsed: i64,
    pub days_until_deadline: i64,
    pub rate_source: RateSource,
    pub rate: DailyRate,
    pub projection: Projection,
    pub finish_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
    pub bars: Vec<ProgressBar>,
    #[serde(skip)]
    pub groups: DayGroups,
}

impl ProgressSnapshot {
    pub fn compute<Tz: TimeZone>(
        records: &[SessionRecord],
        goal: &Goal,
        rate_source: RateSource,
        now: &DateTime<Tz>,
    ) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let groups = group_by_day(records, &tz);

        let total = total(records);
        let today_sum = groups.today(today).map(|g| g.sum).unwrap_or(0);
        let daily_average = groups.daily_average();
        let remaining = goal.total.saturating_sub(total);
        let days_elapsed = days_elapsed_since_first(records, now.with_timezone(&Utc));
        let days_left = days_until_deadline(&goal.deadline(&tz), now);
        let rate = rate_from_groups(&groups, today, rate_source);
        let projection = project(remaining, rate);
        let finish_date = estimated_finish_date(projection, now).map(|d| d.date_naive());

        let mut bars = vec![ProgressBar::new("Today's progress", today_sum, goal.daily)];
        if let Some(days) = projection.days() {
            let label = match finish_date {
                Some(d) => format!("Estimated days left ({d})"),
                None => "Estimated days left".to_string(),
            };
            bars.push(ProgressBar::new(label, days_elapsed, days_elapsed.saturating_add(days)));
        }
        bars.push(ProgressBar::new("Average per day", daily_average, goal.daily));
        bars.push(ProgressBar::new("Goal progress", total, goal.total));
        bars.push(ProgressBar::new(
            format!("Goal days left ({})", goal.end_date),
            days_elapsed,
            days_left,
        ));

        Self {
            today,
            today_sum,
            total,
            days_recorded: groups.len(),
            daily_average,
            remaining,
            days_elapsed,
            days_until_deadline: days_left,
            rate_source,
            rate,
            projection,
            finish_date,
            end_date: goal.end_date,
            bars,
            groups,
        }
    }

    pub fn goal_met(&self) -> bool {
        self.remaining <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::BarStatus;
    use crate::stats::{daily_average, estimated_days_remaining, today_group};
    use chrono::{Duration, FixedOffset};

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-06-15T09:00:00+09:00").unwrap()
    }

    fn days_ago(days: i64, count: i64) -> SessionRecord {
        SessionRecord::draft(count, (now() - Duration::days(days)).with_timezone(&Utc))
    }

    fn goal() -> Goal {
        Goal {
            total: 1000,
            end_date: NaiveDate::from_ymd_opt(2026, 6, 25).unwrap(),
            daily: 30,
        }
    }

    #[test]
    fn snapshot_agrees_with_individual_queries() {
        let records = vec![
            days_ago(0, 10),
            days_ago(0, 15),
            days_ago(2, 40),
            days_ago(5, 20),
            days_ago(12, 30),
        ];
        let s = ProgressSnapshot::compute(&records, &goal(), RateSource::Rolling7, &now());

        assert_eq!(s.total, 115);
        assert_eq!(s.today_sum, today_group(&records, &now()).unwrap().sum);
        assert_eq!(s.daily_average, daily_average(&records, &now().timezone()));
        assert_eq!(
            s.projection,
            estimated_days_remaining(&records, 1000, &now(), RateSource::Rolling7)
        );
        assert_eq!(s.remaining, 885);
        assert_eq!(s.days_elapsed, 12);
        assert_eq!(s.days_until_deadline, 9);
        assert_eq!(s.days_recorded, 4);
        // 885 / (60 / 2)
        assert_eq!(s.projection, Projection::Days(29));
        assert_eq!(s.finish_date, NaiveDate::from_ymd_opt(2026, 7, 14));
        assert_eq!(s.bars.len(), 5);
    }

    #[test]
    fn empty_history_has_no_estimate_bar() {
        let s = ProgressSnapshot::compute(&[], &goal(), RateSource::Rolling7, &now());
        assert_eq!(s.total, 0);
        assert_eq!(s.days_elapsed, 0);
        assert_eq!(s.projection, Projection::Unavailable);
        assert_eq!(s.finish_date, None);
        assert_eq!(s.bars.len(), 4);
        assert!(s.bars.iter().all(|b| !b.label.starts_with("Estimated")));
    }

    #[test]
    fn counts_near_i64_max_saturate() {
        let records = vec![days_ago(0, i64::MAX), days_ago(0, 1)];
        let s = ProgressSnapshot::compute(&records, &goal(), RateSource::Rolling7, &now());
        assert_eq!(s.total, i64::MAX);
        assert_eq!(s.today_sum, i64::MAX);
        assert_eq!(s.remaining, 1000 - i64::MAX);
        assert!(s.goal_met());
        assert_eq!(s.projection, Projection::GoalMet);
    }

    #[test]
    fn huge_goal_keeps_estimate_bar_finite() {
        let goal = Goal {
            total: i64::MAX,
            ..goal()
        };
        let records = vec![days_ago(3, 1)];
        let s = ProgressSnapshot::compute(&records, &goal, RateSource::Rolling7, &now());
        assert_eq!(s.days_elapsed, 3);
        assert_eq!(s.remaining, i64::MAX - 1);
        assert_eq!(s.projection, Projection::Days(i64::MAX - 1));
        assert_eq!(s.finish_date, None);
        let estimate = s
            .bars
            .iter()
            .find(|b| b.label.starts_with("Estimated"))
            .unwrap();
        assert_eq!(estimate.goal, i64::MAX);
        assert_eq!(estimate.status(), BarStatus::Remaining(i64::MAX - 3));
    }

    #[test]
    fn exceeded_goal_reports_met() {
        let records = vec![days_ago(0, 1200)];
        let s = ProgressSnapshot::compute(&records, &goal(), RateSource::Rolling7, &now());
        assert!(s.goal_met());
        assert_eq!(s.remaining, -200);
        assert_eq!(s.projection, Projection::GoalMet);
        assert_eq!(s.finish_date, Some(now().date_naive()));
    }
}
