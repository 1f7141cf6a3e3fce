//! SQLite-backed record collections and profile state.
//!
//! Provides persistent storage for:
//! - Session records, one JSON document per row, grouped by collection
//! - Key-value store for application state (the signed-in profile)

use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

use super::{data_dir, RecordStore};
use crate::error::{CoreError, StoreError};
use crate::record::{RecordDocument, RecordId, SessionRecord};

/// SQLite database holding every user's record collection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/burpees.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("burpees.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "opened record database");
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS records (
                id          TEXT PRIMARY KEY,
                collection  TEXT NOT NULL,
                document    TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_records_collection ON records(collection);",
        )?;
        Ok(())
    }

    /// Record collection named `name`.
    pub fn collection(&self, name: &str) -> RecordCollection<'_> {
        RecordCollection {
            db: self,
            name: name.to_string(),
        }
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// One user's records inside a [`Database`].
pub struct RecordCollection<'a> {
    db: &'a Database,
    name: String,
}

impl RecordCollection<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl RecordStore for RecordCollection<'_> {
    fn append(&mut self, record: &SessionRecord) -> Result<SessionRecord, StoreError> {
        let id = RecordId::generate();
        let document = serde_json::to_string(&RecordDocument::from(record))
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        self.db.conn.execute(
            "INSERT INTO records (id, collection, document, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![id.as_str(), self.name, document, Utc::now().to_rfc3339()],
        )?;
        tracing::info!(collection = %self.name, %id, count = record.count, "appended record");
        Ok(record.clone().with_id(id))
    }

    fn fetch_all(&self) -> Result<Vec<SessionRecord>, StoreError> {
        let mut stmt = self
            .db
            .conn
            .prepare("SELECT id, document FROM records WHERE collection = ?1")?;
        let rows = stmt.query_map(params![self.name], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, document) = row?;
            let doc: RecordDocument =
                serde_json::from_str(&document).map_err(|e| StoreError::MalformedDocument {
                    id: id.clone(),
                    message: e.to_string(),
                })?;
            records.push(doc.into_record(RecordId::new(id))?);
        }
        tracing::debug!(collection = %self.name, records = records.len(), "fetched records");
        Ok(records)
    }
}
