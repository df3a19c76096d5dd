use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::error::{Error, Result};
use crate::models::attendance::{AttendanceRecord, RecordKey, RecordPatch};
use crate::services::record_store::AttendanceStore;

/// Process-local record store. The whole merge runs under the write lock,
/// so a read never observes a half-applied patch.
#[derive(Clone, Default)]
pub struct InMemoryAttendanceStore {
    records: Arc<RwLock<BTreeMap<RecordKey, AttendanceRecord>>>,
}

impl InMemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect<P>(&self, predicate: P) -> Result<Vec<AttendanceRecord>>
    where
        P: Fn(&RecordKey) -> bool,
    {
        let guard = self
            .records
            .read()
            .map_err(|_| Error::Internal("attendance store lock poisoned".to_string()))?;
        Ok(guard
            .iter()
            .filter(|(key, _)| predicate(key))
            .map(|(_, record)| record.clone())
            .collect())
    }
}

#[async_trait]
impl AttendanceStore for InMemoryAttendanceStore {
    async fn merge_upsert(&self, key: &RecordKey, patch: &RecordPatch) -> Result<AttendanceRecord> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| Error::Internal("attendance store lock poisoned".to_string()))?;
        let record = guard
            .entry(key.clone())
            .and_modify(|existing| existing.apply(patch))
            .or_insert_with(|| AttendanceRecord::from_first_scan(key, patch));
        Ok(record.clone())
    }

    async fn get_by_participant(&self, participant_id: &str) -> Result<Vec<AttendanceRecord>> {
        self.collect(|key| key.participant_id == participant_id)
    }

    async fn get_by_session(&self, session_id: &str) -> Result<Vec<AttendanceRecord>> {
        let mut records = self.collect(|key| key.session_id == session_id)?;
        records.sort_by(|a, b| a.participant_id.cmp(&b.participant_id));
        Ok(records)
    }

    async fn get_all(&self) -> Result<Vec<AttendanceRecord>> {
        self.collect(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::ScanKind;
    use crate::models::participant::DisplayFields;
    use chrono::{TimeZone, Utc};

    fn patch(kind: ScanKind, minute: u32) -> RecordPatch {
        RecordPatch {
            scan_kind: kind,
            scanned_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, minute, 0).unwrap(),
            participant: DisplayFields::default(),
            session_title: None,
            session_day: None,
            session_time: None,
        }
    }

    #[test]
    fn one_record_per_key() {
        let store = InMemoryAttendanceStore::new();
        let key = RecordKey::new("p-1", "s-1");

        let first = tokio_test::block_on(store.merge_upsert(&key, &patch(ScanKind::Entry, 0))).unwrap();
        let second = tokio_test::block_on(store.merge_upsert(&key, &patch(ScanKind::Exit, 30))).unwrap();
        tokio_test::block_on(store.merge_upsert(&RecordKey::new("p-2", "s-1"), &patch(ScanKind::Exit, 5)))
            .unwrap();

        assert_eq!(first.id, second.id);
        assert!(second.is_complete());
        assert_eq!(tokio_test::block_on(store.get_all()).unwrap().len(), 2);
        assert_eq!(tokio_test::block_on(store.get_by_participant("p-1")).unwrap().len(), 1);

        let by_session = tokio_test::block_on(store.get_by_session("s-1")).unwrap();
        let ids: Vec<&str> = by_session.iter().map(|r| r.participant_id.as_str()).collect();
        assert_eq!(ids, vec!["p-1", "p-2"]);
    }
}
