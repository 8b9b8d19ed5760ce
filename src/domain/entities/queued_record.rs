use crate::domain::value_objects::{RecordId, RecordKind, RecordPayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit of durable storage in the offline queue.
///
/// Only `synced` changes after creation, and only from `false` to `true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueuedRecord {
    pub id: RecordId,
    pub kind: RecordKind,
    pub payload: RecordPayload,
    pub created_at: DateTime<Utc>,
    pub synced: bool,
}

impl QueuedRecord {
    /// A freshly captured, unsynced record.
    pub fn capture(kind: RecordKind, payload: RecordPayload) -> Self {
        Self {
            id: RecordId::generate(),
            kind,
            payload,
            created_at: Utc::now(),
            synced: false,
        }
    }

    pub fn restore(
        id: RecordId,
        kind: RecordKind,
        payload: RecordPayload,
        created_at: DateTime<Utc>,
        synced: bool,
    ) -> Self {
        Self {
            id,
            kind,
            payload,
            created_at,
            synced,
        }
    }
}
