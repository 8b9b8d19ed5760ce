use crate::domain::value_objects::{RecordId, RecordKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FailedDispatch {
    pub record_id: RecordId,
    pub kind: RecordKind,
    pub reason: String,
}

/// Outcome of one pass over the unsynced records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DrainReport {
    /// Another drain was in flight; nothing was attempted.
    pub skipped: bool,
    pub attempted: u32,
    pub synced: u32,
    pub failed: Vec<FailedDispatch>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DrainReport {
    pub fn started(started_at: DateTime<Utc>) -> Self {
        Self {
            skipped: false,
            attempted: 0,
            synced: 0,
            failed: Vec::new(),
            started_at,
            finished_at: started_at,
        }
    }

    pub fn skipped() -> Self {
        let now = Utc::now();
        Self {
            skipped: true,
            ..Self::started(now)
        }
    }

    pub fn failed_count(&self) -> u32 {
        self.failed.len() as u32
    }

    pub fn is_clean(&self) -> bool {
        !self.skipped && self.failed.is_empty()
    }
}
