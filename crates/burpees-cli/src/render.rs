//! Plain-text rendering of progress bars and the finish projection.

use burpees_core::{BarStatus, ProgressBar, ProgressSnapshot, Projection};

const WIDTH: usize = 30;

pub fn bar(bar: &ProgressBar) -> String {
    let filled = ((bar.fraction() * WIDTH as f64).round() as usize).min(WIDTH);
    let body = format!("{}{}", "#".repeat(filled), "-".repeat(WIDTH - filled));
    let tail = match bar.status() {
        BarStatus::Remaining(n) => format!("{} ({n} to go)", bar.progress),
        BarStatus::Met => format!("{} (done)", bar.progress),
        BarStatus::Exceeded(n) => format!("{} (+{n})", bar.progress),
    };
    format!("{}\n  [{body}] {tail}", bar.label)
}

pub fn projection(snapshot: &ProgressSnapshot) -> String {
    match (snapshot.projection, snapshot.finish_date) {
        (Projection::GoalMet, _) => format!(
            "Goal met: {} of {} ({} over)",
            snapshot.total,
            snapshot.total.saturating_add(snapshot.remaining),
            snapshot.remaining.saturating_neg()
        ),
        (Projection::Days(n), Some(date)) => {
            format!("Estimated finish: {date} ({n} more days at current pace)")
        }
        (Projection::Days(n), None) => format!("Estimated {n} more days at current pace"),
        (Projection::Unavailable, _) => {
            "Estimated finish: unavailable (no recent sessions to project from)".to_string()
        }
    }
}
