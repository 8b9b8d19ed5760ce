use crate::domain::entities::DrainReport;

/// Receives drain outcomes, typically to refresh a "syncing…" indicator.
pub trait SyncEventEmitter: Send + Sync {
    fn emit_report(&self, report: &DrainReport) -> Result<(), String>;
    fn emit_failure(&self, message: &str) -> Result<(), String>;
}
