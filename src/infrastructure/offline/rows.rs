use crate::domain::entities::QueuedRecord;
use crate::domain::value_objects::{RecordId, RecordKind, RecordPayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::convert::TryFrom;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QueuedRecordRow {
    pub id: String,
    pub kind: String,
    pub payload: String,
    pub created_at: i64,
    pub synced: bool,
}

impl TryFrom<QueuedRecordRow> for QueuedRecord {
    type Error = String;

    fn try_from(row: QueuedRecordRow) -> Result<Self, Self::Error> {
        let id = RecordId::new(row.id)?;
        let payload = RecordPayload::from_json_str(&row.payload)?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(row.created_at)
            .ok_or_else(|| format!("Invalid created_at timestamp: {}", row.created_at))?;

        Ok(QueuedRecord::restore(
            id,
            RecordKind::from(row.kind),
            payload,
            created_at,
            row.synced,
        ))
    }
}
