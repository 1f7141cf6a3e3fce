//! Aggregation engine for burpee sessions.
//!
//! Pure functions over plain record lists: grouping by local calendar
//! day, totals and averages, and goal-completion projections. Nothing in
//! here touches storage or owns a backend handle.

mod aggregate;
mod grouping;
mod projection;
mod snapshot;

pub use aggregate::{
    daily_average, first_record, history_start, last_7_days_groups, remaining_to_goal,
    today_group, total,
};

pub use grouping::{
    day_key, group_by_day, DayGroup, DayGroups, TRAILING_WINDOW_FARTHEST,
    TRAILING_WINDOW_NEAREST,
};

pub use projection::{
    days_elapsed_since_first, days_until_deadline, estimated_days_remaining,
    estimated_finish_date, project, rate_from_groups, recent_daily_rate, DailyRate,
    Projection, RateSource,
};

pub use snapshot::ProgressSnapshot;
