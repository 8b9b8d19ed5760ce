use crate::application::ports::{ConnectivityProbe, OfflineQueue, SyncEventEmitter};
use crate::application::services::dispatch_registry::DispatchRegistry;
use crate::domain::entities::{DrainReport, FailedDispatch, QueuedRecord};
use crate::infrastructure::offline::metrics::{DispatchOutcome, SyncMetrics, SyncMetricsSnapshot};
use crate::shared::config::SyncConfig;
use crate::shared::error::{AppError, DispatchError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusSnapshot {
    pub is_syncing: bool,
    pub auto_sync_running: bool,
    /// `None` when the backlog could not be counted.
    pub pending_count: Option<u64>,
    pub last_sync: Option<DateTime<Utc>>,
    pub last_report: Option<DrainReport>,
    pub metrics: SyncMetricsSnapshot,
}

/// Drives the offline queue towards the remote store.
///
/// One instance per application, shared as `Arc`. At most one drain runs at a
/// time; overlapping [`SyncOrchestrator::sync_all`] calls return a skipped
/// report instead of draining twice.
pub struct SyncOrchestrator {
    queue: Arc<dyn OfflineQueue>,
    registry: DispatchRegistry,
    connectivity: Arc<dyn ConnectivityProbe>,
    config: SyncConfig,
    event_emitter: Option<Arc<dyn SyncEventEmitter>>,
    syncing: AtomicBool,
    timer: Mutex<Option<JoinHandle<()>>>,
    last_report: RwLock<Option<DrainReport>>,
    metrics: SyncMetrics,
}

/// Holds the `syncing` flag for the lifetime of one drain.
struct DrainGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> DrainGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl SyncOrchestrator {
    pub fn new(
        queue: Arc<dyn OfflineQueue>,
        registry: DispatchRegistry,
        connectivity: Arc<dyn ConnectivityProbe>,
        config: SyncConfig,
    ) -> Result<Arc<Self>, AppError> {
        Self::with_emitter(queue, registry, connectivity, config, None)
    }

    pub fn with_emitter(
        queue: Arc<dyn OfflineQueue>,
        registry: DispatchRegistry,
        connectivity: Arc<dyn ConnectivityProbe>,
        config: SyncConfig,
        event_emitter: Option<Arc<dyn SyncEventEmitter>>,
    ) -> Result<Arc<Self>, AppError> {
        registry.validate()?;

        Ok(Arc::new(Self {
            queue,
            registry,
            connectivity,
            config,
            event_emitter,
            syncing: AtomicBool::new(false),
            timer: Mutex::new(None),
            last_report: RwLock::new(None),
            metrics: SyncMetrics::new(),
        }))
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    pub fn is_auto_sync_running(&self) -> bool {
        self.lock_timer()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Starts the recurring drain. Returns `false` if it was already running.
    ///
    /// The first tick fires immediately, so a drain happens right away when
    /// the runtime is online.
    pub fn start_auto_sync(self: &Arc<Self>, interval: Duration) -> Result<bool, AppError> {
        if interval.is_zero() {
            return Err(AppError::ConfigurationError(
                "auto sync interval must be greater than 0".to_string(),
            ));
        }

        let mut timer = self.lock_timer();
        if timer.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Ok(false);
        }

        // Weak so that dropping the last orchestrator handle ends the loop.
        let orchestrator = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let Some(orchestrator) = orchestrator.upgrade() else {
                    break;
                };
                orchestrator.drain_if_online().await;
            }
        });
        *timer = Some(handle);

        tracing::info!(
            target: "offline::sync",
            interval_ms = interval.as_millis() as u64,
            "auto sync started"
        );
        Ok(true)
    }

    /// Starts auto sync with the configured interval when enabled.
    pub fn start_configured(self: &Arc<Self>) -> Result<bool, AppError> {
        if !self.config.auto_sync {
            return Ok(false);
        }
        self.start_auto_sync(self.config.sync_interval())
    }

    /// Cancels the recurring drain. A drain cut off mid-flight leaves its
    /// remaining records pending.
    ///
    /// Cancellation lands at the task's next poll, so an in-flight drain may
    /// still hold the drain flag when this returns. Use
    /// [`SyncOrchestrator::shutdown`] to wait for it to let go.
    pub fn stop_auto_sync(&self) {
        if let Some(handle) = self.take_timer() {
            handle.abort();
        }
    }

    /// Cancels the recurring drain and waits until the timer task is gone.
    pub async fn shutdown(&self) {
        let Some(handle) = self.take_timer() else {
            return;
        };
        handle.abort();
        if let Err(err) = handle.await {
            if err.is_panic() {
                tracing::error!(target: "offline::sync", error = %err, "auto sync task panicked");
            }
        }
    }

    pub fn dispose(&self) {
        self.stop_auto_sync();
    }

    /// Drains only when the connectivity probe reports online.
    pub async fn drain_if_online(&self) -> Option<DrainReport> {
        if !self.connectivity.is_online().await {
            tracing::trace!(target: "offline::sync", "offline; drain deferred");
            return None;
        }
        Some(self.sync_all().await)
    }

    /// One pass over every unsynced record, in insertion order.
    pub async fn sync_all(&self) -> DrainReport {
        let Some(_guard) = DrainGuard::acquire(&self.syncing) else {
            self.metrics.record_skipped_drain();
            tracing::debug!(target: "offline::sync", "drain already in progress; skipping");
            return DrainReport::skipped();
        };

        let mut report = DrainReport::started(Utc::now());
        let records = self.queue.get_unsynced().await;

        for record in records {
            report.attempted += 1;
            match self.deliver(&record).await {
                Ok(()) => report.synced += 1,
                Err(reason) => report.failed.push(FailedDispatch {
                    record_id: record.id.clone(),
                    kind: record.kind.clone(),
                    reason,
                }),
            }
        }

        report.finished_at = Utc::now();
        self.metrics.record_drain();
        *self.last_report.write().await = Some(report.clone());

        tracing::info!(
            target: "offline::sync",
            attempted = report.attempted,
            synced = report.synced,
            failed = report.failed_count(),
            "drain completed"
        );
        self.emit_report(&report);
        report
    }

    pub async fn status(&self) -> SyncStatusSnapshot {
        let pending_count = match self.queue.count_unsynced().await {
            Ok(count) => Some(count),
            Err(err) => {
                tracing::warn!(target: "offline::sync", error = %err, "failed to count pending records");
                None
            }
        };
        let last_report = self.last_report.read().await.clone();

        SyncStatusSnapshot {
            is_syncing: self.is_syncing(),
            auto_sync_running: self.is_auto_sync_running(),
            pending_count,
            last_sync: last_report.as_ref().map(|report| report.finished_at),
            last_report,
            metrics: self.metrics.snapshot(),
        }
    }

    pub fn metrics(&self) -> SyncMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Dispatches one record and records the outcome in the queue.
    async fn deliver(&self, record: &QueuedRecord) -> Result<(), String> {
        if let Err(err) = self.dispatch(record).await {
            self.metrics.record_dispatch(DispatchOutcome::Failure);
            tracing::warn!(
                target: "offline::sync",
                record_id = %record.id,
                kind = %record.kind,
                error = %err,
                "dispatch failed; record stays pending"
            );
            return Err(err.to_string());
        }

        if let Err(err) = self.queue.mark_synced(&record.id).await {
            // Delivered but not recorded: it will be delivered again next drain.
            self.metrics.record_dispatch(DispatchOutcome::Failure);
            tracing::error!(
                target: "offline::sync",
                record_id = %record.id,
                error = %err,
                "record delivered but could not be marked synced"
            );
            self.emit_failure(&format!("failed to mark {} synced: {err}", record.id));
            return Err(format!("delivered but not marked synced: {err}"));
        }

        self.metrics.record_dispatch(DispatchOutcome::Success);
        tracing::debug!(
            target: "offline::sync",
            record_id = %record.id,
            kind = %record.kind,
            "record synced"
        );

        if self.config.evict_on_sync {
            if let Err(err) = self.queue.delete(&record.id).await {
                tracing::warn!(
                    target: "offline::sync",
                    record_id = %record.id,
                    error = %err,
                    "failed to evict synced record"
                );
            }
        }
        Ok(())
    }

    async fn dispatch(&self, record: &QueuedRecord) -> Result<(), DispatchError> {
        let attempt = self.registry.dispatch(record);
        match self.config.dispatch_timeout() {
            Some(limit) => tokio::time::timeout(limit, attempt)
                .await
                .unwrap_or(Err(DispatchError::Timeout(limit))),
            None => attempt.await,
        }
    }

    fn emit_report(&self, report: &DrainReport) {
        if let Some(emitter) = &self.event_emitter {
            if let Err(err) = emitter.emit_report(report) {
                tracing::warn!(
                    target: "offline::sync",
                    error = %err,
                    "failed to emit drain report"
                );
            }
        }
    }

    fn emit_failure(&self, message: &str) {
        if let Some(emitter) = &self.event_emitter {
            if let Err(err) = emitter.emit_failure(message) {
                tracing::warn!(
                    target: "offline::sync",
                    error = %err,
                    "failed to emit sync failure"
                );
            }
        }
    }

    fn take_timer(&self) -> Option<JoinHandle<()>> {
        let handle = self.lock_timer().take()?;
        tracing::info!(target: "offline::sync", "auto sync stopped");
        Some(handle)
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for SyncOrchestrator {
    fn drop(&mut self) {
        self.stop_auto_sync();
    }
}
