mod config;
pub mod database;
pub mod memory;

pub use config::{Config, EntryConfig, FeedbackConfig, ProjectionConfig};
pub use database::{Database, RecordCollection};
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::{ConfigError, StoreError};
use crate::record::SessionRecord;

/// A collection of session records held by a backend.
///
/// Writes are append-only. Implementations deliver `fetch_all` in no
/// particular order; callers sort before grouping.
pub trait RecordStore {
    /// Store `record` and return it with its assigned id.
    fn append(&mut self, record: &SessionRecord) -> Result<SessionRecord, StoreError>;

    /// Every record in the collection.
    fn fetch_all(&self) -> Result<Vec<SessionRecord>, StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn append(&mut self, record: &SessionRecord) -> Result<SessionRecord, StoreError> {
        (**self).append(record)
    }

    fn fetch_all(&self) -> Result<Vec<SessionRecord>, StoreError> {
        (**self).fetch_all()
    }
}

/// Returns the data directory, creating it if needed.
///
/// `BURPEES_DATA_DIR` wins when set. Otherwise `~/.config/daily-burpees`,
/// or `~/.config/daily-burpees-dev` with `BURPEES_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("BURPEES_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("BURPEES_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("daily-burpees-dev")
            } else {
                base_dir.join("daily-burpees")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
