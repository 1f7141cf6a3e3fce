use burpees_core::{Config, Database};
use chrono::Local;

use super::signed_in_tracker;
use crate::render;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let tracker = signed_in_tracker(&db, &config)?;
    let snapshot = tracker.snapshot(&config.goal, &Local::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    for bar in &snapshot.bars {
        println!("{}", render::bar(bar));
    }
    println!();
    println!("{}", render::projection(&snapshot));
    Ok(())
}
