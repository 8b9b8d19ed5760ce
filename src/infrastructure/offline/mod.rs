pub mod metrics;
mod rows;
pub mod sqlite_queue;

pub use metrics::{DispatchOutcome, SyncMetrics, SyncMetricsSnapshot};
pub use sqlite_queue::SqliteOfflineQueue;
