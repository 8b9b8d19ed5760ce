#![allow(dead_code)]

pub mod mocks;

use fieldsync::{DatabaseConfig, SqliteOfflineQueue, SyncConfig};
use std::future::Future;
use std::time::Duration;
use tempfile::TempDir;

pub fn file_database_config(dir: &TempDir) -> DatabaseConfig {
    DatabaseConfig {
        url: format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("field_queue.db").display()
        ),
        max_connections: 1,
        connection_timeout: 5,
    }
}

pub fn file_queue(dir: &TempDir) -> SqliteOfflineQueue {
    SqliteOfflineQueue::new(&file_database_config(dir)).expect("queue config")
}

pub fn manual_sync_config() -> SyncConfig {
    SyncConfig {
        auto_sync: false,
        sync_interval_ms: 1_000,
        dispatch_timeout_ms: 2_000,
        evict_on_sync: false,
    }
}

/// Polls `check` until it returns true or `limit` elapses.
pub async fn eventually<F, Fut>(limit: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    tokio::time::timeout(limit, async {
        loop {
            if check().await {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .is_ok()
}
