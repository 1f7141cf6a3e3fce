//! Progress bar model.
//!
//! A bar compares `progress` to `goal`. Going over the goal is its own
//! status so the display can show the surplus instead of a remainder.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum BarStatus {
    Remaining(i64),
    Met,
    Exceeded(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressBar {
    pub label: String,
    pub progress: i64,
    pub goal: i64,
}

impl ProgressBar {
    pub fn new(label: impl Into<String>, progress: i64, goal: i64) -> Self {
        Self {
            label: label.into(),
            progress,
            goal,
        }
    }

    /// Gap between progress and goal. Amounts saturate at `i64::MAX`.
    pub fn status(&self) -> BarStatus {
        match self.progress.cmp(&self.goal) {
            Ordering::Less => BarStatus::Remaining(self.goal.saturating_sub(self.progress)),
            Ordering::Equal => BarStatus::Met,
            Ordering::Greater => BarStatus::Exceeded(self.progress.saturating_sub(self.goal)),
        }
    }

    /// Filled share of the bar, clamped to `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.goal <= 0 {
            return if self.progress > 0 { 1.0 } else { 0.0 };
        }
        (self.progress as f64 / self.goal as f64).clamp(0.0, 1.0)
    }
}
