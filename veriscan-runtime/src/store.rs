//! In-process scan store
//!
//! Tracks scans through queued -> processing -> completed | failed.
//! This is the embedding point for a polling front end; the CLI batch
//! command drives it directly. Nothing is persisted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use veriscan_core::ScanResult;

/// Lifecycle of one submitted scan. No retries: a failed scan stays
/// failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Queued => "queued",
            ScanStatus::Processing => "processing",
            ScanStatus::Completed => "completed",
            ScanStatus::Failed => "failed",
        }
    }
}

/// One tracked scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanRecord {
    pub id: Uuid,
    pub target: String,
    pub status: ScanStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScanResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Thread-safe scan registry
#[derive(Clone, Default)]
pub struct ScanStore {
    records: Arc<DashMap<Uuid, ScanRecord>>,
}

impl ScanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new scan in the queued state
    pub fn submit(&self, target: impl Into<String>) -> Uuid {
        let id = Uuid::new_v4();
        let record = ScanRecord {
            id,
            target: target.into(),
            status: ScanStatus::Queued,
            submitted_at: Utc::now(),
            result: None,
            error: None,
        };
        self.records.insert(id, record);
        id
    }

    pub fn mark_processing(&self, id: Uuid) {
        if let Some(mut record) = self.records.get_mut(&id) {
            record.status = ScanStatus::Processing;
        }
    }

    pub fn complete(&self, id: Uuid, result: ScanResult) {
        if let Some(mut record) = self.records.get_mut(&id) {
            record.status = ScanStatus::Completed;
            record.result = Some(result);
        }
    }

    pub fn fail(&self, id: Uuid, error: impl Into<String>) {
        if let Some(mut record) = self.records.get_mut(&id) {
            record.status = ScanStatus::Failed;
            record.error = Some(error.into());
        }
    }

    pub fn get(&self, id: Uuid) -> Option<ScanRecord> {
        self.records.get(&id).map(|r| r.value().clone())
    }

    /// All records, newest first
    pub fn list(&self) -> Vec<ScanRecord> {
        let mut records: Vec<ScanRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veriscan_core::merge_findings;

    fn sample_result() -> ScanResult {
        ScanResult::new(
            "https://acme.example/",
            "acme.example",
            "Acme",
            merge_findings(&[]),
            Utc::now(),
        )
    }

    #[test]
    fn test_submit_starts_queued() {
        let store = ScanStore::new();
        let id = store.submit("acme.example");

        let record = store.get(id).unwrap();
        assert_eq!(record.status, ScanStatus::Queued);
        assert_eq!(record.target, "acme.example");
        assert!(record.result.is_none());
        assert!(record.error.is_none());
    }

    #[test]
    fn test_complete_transition() {
        let store = ScanStore::new();
        let id = store.submit("acme.example");

        store.mark_processing(id);
        assert_eq!(store.get(id).unwrap().status, ScanStatus::Processing);

        store.complete(id, sample_result());
        let record = store.get(id).unwrap();
        assert_eq!(record.status, ScanStatus::Completed);
        assert!(record.result.is_some());
        assert!(record.error.is_none());
    }

    #[test]
    fn test_fail_transition() {
        let store = ScanStore::new();
        let id = store.submit("bad target");

        store.mark_processing(id);
        store.fail(id, "Invalid target: bad target");

        let record = store.get(id).unwrap();
        assert_eq!(record.status, ScanStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("Invalid target: bad target"));
        assert!(record.result.is_none());
    }

    #[test]
    fn test_unknown_id() {
        let store = ScanStore::new();
        store.mark_processing(Uuid::new_v4());
        assert!(store.get(Uuid::new_v4()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_newest_first() {
        let store = ScanStore::new();
        let first = store.submit("one.example");
        let second = store.submit("two.example");

        let records = store.list();
        assert_eq!(records.len(), 2);
        assert!(records[0].submitted_at >= records[1].submitted_at);
        assert!(records.iter().any(|r| r.id == first));
        assert!(records.iter().any(|r| r.id == second));
    }
}
