use super::RecordStore;
use crate::error::StoreError;
use crate::record::{RecordId, SessionRecord};

/// In-memory record collection.
///
/// `fail_with` makes every call return [`StoreError::Unavailable`], which
/// is how tests stand in for an unreachable backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<SessionRecord>,
    fail_with: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `records`; ids are assigned where missing.
    pub fn with_records(records: impl IntoIterator<Item = SessionRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| match r.id {
                Some(_) => r,
                None => r.with_id(RecordId::generate()),
            })
            .collect();
        Self {
            records,
            fail_with: None,
        }
    }

    pub fn fail_with(&mut self, message: impl Into<String>) {
        self.fail_with = Some(message.into());
    }

    pub fn recover(&mut self) {
        self.fail_with = None;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.fail_with {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

impl RecordStore for MemoryStore {
    fn append(&mut self, record: &SessionRecord) -> Result<SessionRecord, StoreError> {
        self.check()?;
        let saved = record.clone().with_id(RecordId::generate());
        self.records.push(saved.clone());
        Ok(saved)
    }

    fn fetch_all(&self) -> Result<Vec<SessionRecord>, StoreError> {
        self.check()?;
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn append_then_fetch() {
        let mut store = MemoryStore::new();
        let saved = store.append(&SessionRecord::draft(10, Utc::now())).unwrap();
        assert!(saved.is_saved());
        assert_eq!(store.fetch_all().unwrap(), vec![saved]);
    }

    #[test]
    fn failure_mode_blocks_both_calls() {
        let mut store = MemoryStore::with_records([SessionRecord::draft(5, Utc::now())]);
        store.fail_with("offline");
        assert!(store.append(&SessionRecord::draft(1, Utc::now())).is_err());
        let err = store.fetch_all().unwrap_err();
        assert_eq!(err.to_string(), "Store unavailable: offline");
        store.recover();
        assert_eq!(store.len(), 1);
    }
}
