use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// A total repetition target with its deadline, plus the per-day target
/// the daily bars are measured against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(default = "default_total")]
    pub total: i64,
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,
    #[serde(default = "default_daily")]
    pub daily: i64,
}

fn default_total() -> i64 {
    10_000
}
fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 12, 31).unwrap_or_default()
}
fn default_daily() -> i64 {
    30
}

impl Default for Goal {
    fn default() -> Self {
        Self {
            total: default_total(),
            end_date: default_end_date(),
            daily: default_daily(),
        }
    }
}

impl Goal {
    /// Start of `end_date` in `tz`.
    ///
    /// If local midnight does not exist (DST gap) the UTC reading of the
    /// same wall time is used.
    pub fn deadline<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        let midnight = self.end_date.and_time(NaiveTime::MIN);
        tz.from_local_datetime(&midnight)
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn deadline_is_local_midnight() {
        let goal = Goal {
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            ..Goal::default()
        };
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let deadline = goal.deadline(&tz);
        assert_eq!(deadline.to_rfc3339(), "2026-12-31T00:00:00-05:00");
    }
}
