//! TOML-based application configuration.
//!
//! Stores:
//! - The goal: total repetitions, end date, and daily target
//! - Session entry defaults (starting count, step, minimum)
//! - Which rate the finish-date projection uses
//! - How long a successful save is acknowledged
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::goal::Goal;
use crate::stats::RateSource;

/// Session entry controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    #[serde(default = "default_amount")]
    pub default_amount: i64,
    #[serde(default = "default_step")]
    pub step: i64,
    #[serde(default = "default_minimum")]
    pub minimum: i64,
}

/// Finish-date projection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default)]
    pub rate: RateSource,
}

/// Save acknowledgement settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default = "default_success_reset_secs")]
    pub success_reset_secs: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub entry: EntryConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

fn default_amount() -> i64 {
    10
}
fn default_step() -> i64 {
    5
}
fn default_minimum() -> i64 {
    5
}
fn default_success_reset_secs() -> u32 {
    2
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            default_amount: default_amount(),
            step: default_step(),
            minimum: default_minimum(),
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            success_reset_secs: default_success_reset_secs(),
        }
    }
}

impl FeedbackConfig {
    pub fn success_reset(&self) -> Duration {
        Duration::seconds(i64::from(self.success_reset_secs))
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as integer")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Check the counts that feed the session stepper and the goals.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first negative
    /// `entry.*`, `goal.total` or `goal.daily`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("goal.total", self.goal.total),
            ("goal.daily", self.goal.daily),
            ("entry.default_amount", self.entry.default_amount),
            ("entry.step", self.entry.step),
            ("entry.minimum", self.entry.minimum),
        ];
        match counts.into_iter().find(|(_, value)| *value < 0) {
            Some((key, value)) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("must be non-negative, got {value}"),
            }),
            None => Ok(()),
        }
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, holds a
    /// negative count, or the defaults cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value does not fit
    /// the field's type, or it makes a count negative. The config is left
    /// unchanged on error.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.update(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.goal.total, 10_000);
        assert_eq!(cfg.goal.daily, 30);
        assert_eq!(cfg.entry.default_amount, 10);
        assert_eq!(cfg.entry.step, 5);
        assert_eq!(cfg.entry.minimum, 5);
        assert_eq!(cfg.projection.rate, RateSource::Rolling7);
        assert_eq!(cfg.feedback.success_reset(), Duration::seconds(2));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[goal]\ntotal = 500\n").unwrap();
        assert_eq!(cfg.goal.total, 500);
        assert_eq!(cfg.goal.daily, 30);
        assert_eq!(cfg.entry, EntryConfig::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("goal.total").as_deref(), Some("10000"));
        assert_eq!(cfg.get("goal.end_date").as_deref(), Some("2026-12-31"));
        assert_eq!(cfg.get("projection.rate").as_deref(), Some("rolling7"));
        assert!(cfg.get("goal.missing").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn update_coerces_by_existing_type() {
        let mut cfg = Config::default();
        cfg.update("goal.total", "20000").unwrap();
        cfg.update("goal.end_date", "2027-06-30").unwrap();
        cfg.update("projection.rate", "all_time").unwrap();
        assert_eq!(cfg.goal.total, 20_000);
        assert_eq!(cfg.goal.end_date, NaiveDate::from_ymd_opt(2027, 6, 30).unwrap());
        assert_eq!(cfg.projection.rate, RateSource::AllTime);
    }

    #[test]
    fn update_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.update("goal.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.update("nope.total", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn update_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.update("goal.total", "lots"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.update("goal.end_date", "31/12/2026"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.update("projection.rate", "weekly"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn update_rejects_negative_counts() {
        let mut cfg = Config::default();
        for key in [
            "entry.default_amount",
            "entry.step",
            "entry.minimum",
            "goal.daily",
            "goal.total",
        ] {
            match cfg.update(key, "-5") {
                Err(ConfigError::InvalidValue { key: rejected, message }) => {
                    assert_eq!(rejected, key);
                    assert!(message.contains("non-negative"), "{message}");
                }
                other => panic!("{key}: expected InvalidValue, got {other:?}"),
            }
        }
        assert_eq!(cfg, Config::default());

        cfg.update("entry.default_amount", "0").unwrap();
        assert_eq!(cfg.entry.default_amount, 0);
    }

    #[test]
    fn load_from_rejects_negative_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[entry]\ndefault_amount = -5\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { key, .. }) if key == "entry.default_amount"
        ));
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.update("entry.step", "10").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().entry.step, 10);
    }

    #[test]
    fn load_from_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "goal = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
