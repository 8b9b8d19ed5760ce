use crate::domain::value_objects::{RecordKind, RecordPayload};
use crate::shared::error::DispatchError;
use async_trait::async_trait;

/// Remote collaborator: "insert payload P as an entity of kind K".
#[async_trait]
pub trait RecordInserter: Send + Sync {
    async fn insert(&self, kind: &RecordKind, payload: &RecordPayload)
        -> Result<(), DispatchError>;
}
