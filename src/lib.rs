//! Offline-first capture queue and sync engine.
//!
//! Captures are written to a durable local queue ([`SqliteOfflineQueue`]) and
//! delivered later, kind by kind, to the remote store by a single
//! [`SyncOrchestrator`] owned by the application root.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::ports::{ConnectivityProbe, OfflineQueue, RecordInserter, SyncEventEmitter};
pub use application::services::{DispatchRegistry, SyncOrchestrator, SyncStatusSnapshot};
pub use domain::entities::{DrainReport, FailedDispatch, QueuedRecord};
pub use domain::value_objects::{RecordId, RecordKind, RecordPayload};
pub use infrastructure::network::ConnectivityFlag;
pub use infrastructure::offline::{SqliteOfflineQueue, SyncMetricsSnapshot};
pub use shared::config::{AppConfig, DatabaseConfig, SyncConfig};
pub use shared::error::{AppError, DispatchError, QueueError, Result};
pub use shared::logging::init_logging;

use std::sync::Arc;

/// The wired queue and orchestrator for one application instance.
pub struct SyncEngine {
    pub queue: Arc<SqliteOfflineQueue>,
    pub orchestrator: Arc<SyncOrchestrator>,
}

impl SyncEngine {
    /// Validates the config, opens the queue and, when enabled, starts auto sync.
    pub async fn bootstrap(
        config: &AppConfig,
        registry: DispatchRegistry,
        connectivity: Arc<dyn ConnectivityProbe>,
        event_emitter: Option<Arc<dyn SyncEventEmitter>>,
    ) -> Result<Self> {
        config.validate().map_err(AppError::ConfigurationError)?;

        let queue = Arc::new(SqliteOfflineQueue::new(&config.database)?);
        queue.init().await?;

        let orchestrator = SyncOrchestrator::with_emitter(
            queue.clone(),
            registry,
            connectivity,
            config.sync.clone(),
            event_emitter,
        )?;
        orchestrator.start_configured()?;

        tracing::info!(target: "offline::sync", "sync engine ready");
        Ok(Self {
            queue,
            orchestrator,
        })
    }

    /// Stops auto sync, waits for any in-flight drain to unwind and closes
    /// the queue.
    pub async fn dispose(&self) {
        self.orchestrator.shutdown().await;
        self.queue.close().await;
    }
}
