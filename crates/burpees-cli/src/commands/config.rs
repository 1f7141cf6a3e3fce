use burpees_core::{Config, ConfigError};
use clap::Subcommand;

/// Top-level tables of `config.toml`.
const SECTIONS: [&str; 4] = ["goal", "entry", "projection", "feedback"];

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value, e.g. "goal.total" or "entry.step"
    Get { key: String },
    /// Change one value and save
    Set {
        key: String,
        /// Parsed as the key's current type ("2027-06-30", "all_time", "25")
        value: String,
    },
    /// Show the config file, or one section of it
    List {
        /// goal, entry, projection or feedback
        section: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Restore every section to its default
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or_else(|| unknown_key(&key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value).map_err(|e| match e {
                ConfigError::UnknownKey(_) => unknown_key(&key),
                other => other.into(),
            })?;
            tracing::debug!(%key, %value, "config updated");
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::List { section, json } => {
            let config = Config::load()?;
            let mut table = match toml::Value::try_from(&config)? {
                toml::Value::Table(table) => table,
                other => return Err(format!("config is not a table: {other}").into()),
            };
            if let Some(name) = section {
                let inner = table.remove(&name).ok_or_else(|| {
                    format!(
                        "unknown config section: {name} (expected one of {})",
                        SECTIONS.join(", ")
                    )
                })?;
                table = toml::Table::from_iter([(name, inner)]);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                print!("{}", toml::to_string_pretty(&table)?);
            }
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

fn unknown_key(key: &str) -> Box<dyn std::error::Error> {
    let hint = match key.split_once('.') {
        Some((section, _)) if SECTIONS.contains(&section) => {
            format!("try `burpees config list {section}`")
        }
        _ => format!("keys start with one of {}", SECTIONS.join(", ")),
    };
    format!("unknown config key: {key} ({hint})").into()
}
