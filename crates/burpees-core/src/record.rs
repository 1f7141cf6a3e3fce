//! Session records and their store-native document shape.
//!
//! A [`SessionRecord`] is immutable once the store has assigned it an id.
//! [`RecordDocument`] is what actually lands in a collection: just the
//! `count` and `date` fields, keyed by the id outside the document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{StoreError, ValidationError};

/// Store-assigned record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id, as assigned by the local store.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One logged burpee session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// `None` until the store has accepted the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub count: i64,
    pub date: DateTime<Utc>,
}

impl SessionRecord {
    /// Create an unsaved record, rejecting negative counts.
    ///
    /// # Errors
    /// Returns [`ValidationError::NegativeCount`] if `count < 0`.
    pub fn new(count: i64, date: DateTime<Utc>) -> Result<Self, ValidationError> {
        if count < 0 {
            return Err(ValidationError::NegativeCount(count));
        }
        Ok(Self::draft(count, date))
    }

    /// Unsaved record with no validation applied.
    pub fn draft(count: i64, date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            count,
            date,
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

/// Document shape stored in a record collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDocument {
    pub count: i64,
    /// RFC 3339 timestamp.
    pub date: String,
}

impl From<&SessionRecord> for RecordDocument {
    fn from(record: &SessionRecord) -> Self {
        Self {
            count: record.count,
            date: record.date.to_rfc3339(),
        }
    }
}

impl RecordDocument {
    /// Map a stored document back to a record carrying `id`.
    ///
    /// # Errors
    /// Returns [`StoreError::MalformedDocument`] if `date` is not RFC 3339.
    pub fn into_record(self, id: RecordId) -> Result<SessionRecord, StoreError> {
        let date = DateTime::parse_from_rfc3339(&self.date)
            .map_err(|e| StoreError::MalformedDocument {
                id: id.to_string(),
                message: format!("bad date '{}': {e}", self.date),
            })?
            .with_timezone(&Utc);
        Ok(SessionRecord {
            id: Some(id),
            count: self.count,
            date,
        })
    }
}

/// Order records newest first, as every fetched list is before grouping.
///
/// The sort is stable, so records sharing a timestamp keep their
/// delivered order.
pub fn sort_newest_first(records: &mut [SessionRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_rejects_negative_count() {
        let now = Utc::now();
        assert!(matches!(
            SessionRecord::new(-1, now),
            Err(ValidationError::NegativeCount(-1))
        ));
        assert_eq!(SessionRecord::new(0, now).unwrap().count, 0);
    }

    #[test]
    fn draft_has_no_id() {
        let rec = SessionRecord::draft(10, Utc::now());
        assert!(!rec.is_saved());
        let saved = rec.with_id(RecordId::new("abc"));
        assert_eq!(saved.id.as_ref().map(RecordId::as_str), Some("abc"));
    }

    #[test]
    fn document_carries_count_and_date() {
        let date = Utc.with_ymd_and_hms(2026, 3, 4, 7, 30, 0).unwrap();
        let doc = RecordDocument::from(&SessionRecord::draft(15, date));
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["count"], 15);
        assert_eq!(json["date"], "2026-03-04T07:30:00+00:00");

        let back = doc.into_record(RecordId::new("r1")).unwrap();
        assert_eq!(back.count, 15);
        assert_eq!(back.date, date);
        assert_eq!(back.id, Some(RecordId::new("r1")));
    }

    #[test]
    fn document_with_bad_date_is_malformed() {
        let doc = RecordDocument {
            count: 5,
            date: "04/03/2026".into(),
        };
        let err = doc.into_record(RecordId::new("x")).unwrap_err();
        assert!(matches!(err, StoreError::MalformedDocument { .. }));
    }

    #[test]
    fn sort_newest_first_orders_descending() {
        let d1 = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        let d2 = Utc.with_ymd_and_hms(2026, 1, 2, 8, 0, 0).unwrap();
        let d3 = Utc.with_ymd_and_hms(2026, 1, 3, 8, 0, 0).unwrap();
        let mut records = vec![
            SessionRecord::draft(1, d2),
            SessionRecord::draft(2, d3),
            SessionRecord::draft(3, d1),
        ];
        sort_newest_first(&mut records);
        let counts: Vec<i64> = records.iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![2, 1, 3]);
    }
}
