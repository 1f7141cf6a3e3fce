use burpees_core::stats::group_by_day;
use burpees_core::{Config, Database, RequestState};
use chrono::{Local, Utc};
use clap::Subcommand;

use super::signed_in_tracker;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Save a session
    Add {
        /// Repetitions (defaults to entry.default_amount)
        count: Option<i64>,
        /// Step the count up this many times
        #[arg(long, default_value = "0")]
        plus: u32,
        /// Step the count down this many times
        #[arg(long, default_value = "0")]
        minus: u32,
    },
    /// List sessions, newest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Per-day totals
    Days {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let mut tracker = signed_in_tracker(&db, &config)?;

    match action {
        SessionAction::Add { count, plus, minus } => {
            if let Some(count) = count {
                tracker.set_count(count);
            }
            for _ in 0..plus {
                tracker.increment();
            }
            for _ in 0..minus {
                tracker.decrement();
            }

            let Some(saved) = tracker.save_session(Utc::now()) else {
                let message = match tracker.add_state() {
                    RequestState::Error { message } => message.clone(),
                    other => format!("save ended in unexpected state {other:?}"),
                };
                return Err(message.into());
            };
            println!("saved {} burpees", saved.count);

            if let RequestState::Error { message } = tracker.fetch_state() {
                eprintln!("warning: reload after save failed: {message}");
            } else {
                let snapshot = tracker.snapshot(&config.goal, &Local::now());
                println!("today: {} / {}", snapshot.today_sum, config.goal.daily);
            }
        }
        SessionAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(tracker.records())?);
            } else if tracker.records().is_empty() {
                println!("no sessions yet");
            } else {
                for record in tracker.records() {
                    let local = record.date.with_timezone(&Local);
                    println!("{}  {:>5}", local.format("%Y-%m-%d %H:%M"), record.count);
                }
            }
        }
        SessionAction::Days { json } => {
            let groups = group_by_day(tracker.records(), &Local);
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else if groups.is_empty() {
                println!("no sessions yet");
            } else {
                for group in &groups {
                    println!(
                        "{}  {:>5}  ({} sessions)",
                        group.day,
                        group.sum,
                        group.records.len()
                    );
                }
            }
        }
    }
    Ok(())
}
