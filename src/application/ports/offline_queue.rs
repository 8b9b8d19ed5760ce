use crate::domain::entities::QueuedRecord;
use crate::domain::value_objects::{RecordId, RecordKind, RecordPayload};
use crate::shared::error::QueueError;
use async_trait::async_trait;

/// Durable log of captured records awaiting delivery.
///
/// Write failures always propagate. Only [`OfflineQueue::get_unsynced`]
/// absorbs read failures, since the rows it misses stay queued.
#[async_trait]
pub trait OfflineQueue: Send + Sync {
    /// Opens the store. Idempotent and safe to call concurrently.
    async fn init(&self) -> Result<(), QueueError>;

    async fn add(&self, kind: RecordKind, payload: RecordPayload)
        -> Result<RecordId, QueueError>;

    /// Unsynced records in insertion order, or the read failure.
    async fn try_get_unsynced(&self) -> Result<Vec<QueuedRecord>, QueueError>;

    async fn get(&self, id: &RecordId) -> Result<Option<QueuedRecord>, QueueError>;

    /// No-op for an id that is absent or already synced.
    async fn mark_synced(&self, id: &RecordId) -> Result<(), QueueError>;

    async fn delete(&self, id: &RecordId) -> Result<(), QueueError>;

    async fn get_all(&self) -> Result<Vec<QueuedRecord>, QueueError>;

    async fn count_unsynced(&self) -> Result<u64, QueueError>;

    /// Removes every synced record, returning how many were removed.
    async fn purge_synced(&self) -> Result<u64, QueueError>;

    /// Unsynced records; an empty list when the scan fails.
    async fn get_unsynced(&self) -> Vec<QueuedRecord> {
        match self.try_get_unsynced().await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    target: "offline::queue",
                    error = %err,
                    "unsynced scan failed; treating as empty for this cycle"
                );
                Vec::new()
            }
        }
    }
}
