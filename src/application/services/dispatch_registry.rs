use crate::application::ports::record_inserter::RecordInserter;
use crate::domain::entities::QueuedRecord;
use crate::domain::value_objects::RecordKind;
use crate::shared::error::{AppError, DispatchError};
use std::collections::HashMap;
use std::sync::Arc;

/// Routing table from record kind to the remote insert for that kind.
#[derive(Clone, Default)]
pub struct DispatchRegistry {
    handlers: HashMap<RecordKind, Arc<dyn RecordInserter>>,
}

impl DispatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, kind: RecordKind, inserter: Arc<dyn RecordInserter>) -> Self {
        self.handlers.insert(kind, inserter);
        self
    }

    /// Routes every known kind to the same inserter.
    pub fn register_all(mut self, inserter: Arc<dyn RecordInserter>) -> Self {
        for kind in RecordKind::KNOWN {
            self.handlers.insert(kind, Arc::clone(&inserter));
        }
        self
    }

    pub fn missing_kinds(&self) -> Vec<RecordKind> {
        RecordKind::KNOWN
            .into_iter()
            .filter(|kind| !self.handlers.contains_key(kind))
            .collect()
    }

    /// Fails unless every known kind has a handler.
    pub fn validate(&self) -> Result<(), AppError> {
        let missing = self.missing_kinds();
        if missing.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = missing.iter().map(RecordKind::as_str).collect();
        Err(AppError::ConfigurationError(format!(
            "no remote handler registered for kinds: {}",
            names.join(", ")
        )))
    }

    pub async fn dispatch(&self, record: &QueuedRecord) -> Result<(), DispatchError> {
        let handler = self
            .handlers
            .get(&record.kind)
            .ok_or_else(|| DispatchError::UnregisteredKind(record.kind.to_string()))?;
        handler.insert(&record.kind, &record.payload).await
    }
}
