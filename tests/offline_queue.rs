mod common;

use common::{file_database_config, file_queue};
use fieldsync::{OfflineQueue, QueueError, RecordId, RecordKind, RecordPayload, SqliteOfflineQueue};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn add_farmer_returns_unique_id_and_single_unsynced_record() {
    let queue = SqliteOfflineQueue::in_memory();

    let id = queue
        .add(RecordKind::Farmer, json!({"name": "Ada"}).into())
        .await
        .expect("add farmer");
    assert!(!id.as_str().is_empty());

    let unsynced = queue.get_unsynced().await;
    assert_eq!(unsynced.len(), 1);
    assert_eq!(unsynced[0].id, id);
    assert_eq!(unsynced[0].kind, RecordKind::Farmer);
    assert_eq!(unsynced[0].payload.as_json(), &json!({"name": "Ada"}));
    assert!(!unsynced[0].synced);
}

#[tokio::test]
async fn rapid_captures_never_share_an_id() {
    let queue = Arc::new(SqliteOfflineQueue::in_memory());

    let mut handles = Vec::new();
    for i in 0..50 {
        let queue = Arc::clone(&queue);
        handles.push(tokio::spawn(async move {
            queue
                .add(RecordKind::Activity, json!({"index": i}).into())
                .await
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.expect("join").expect("add"));
    }
    assert_eq!(ids.len(), 50);
    assert_eq!(queue.count_unsynced().await.expect("count"), 50);
}

#[tokio::test]
async fn captures_survive_process_restart() {
    let dir = TempDir::new().expect("temp dir");
    let payloads = [
        (RecordKind::Farmer, json!({"name": "Ada", "village": "Kisumu"})),
        (RecordKind::Plot, json!({"hectares": 1.25, "crop": "sorghum"})),
        (RecordKind::Batch, json!(["bag-1", "bag-2"])),
    ];

    let mut ids = Vec::new();
    {
        let queue = file_queue(&dir);
        for (kind, payload) in payloads.iter().cloned() {
            ids.push(queue.add(kind, payload.into()).await.expect("add"));
        }
        queue.close().await;
    }

    let restarted = file_queue(&dir);
    let unsynced = restarted.get_unsynced().await;
    assert_eq!(unsynced.len(), payloads.len());
    for ((record, id), (kind, payload)) in unsynced.iter().zip(&ids).zip(payloads.iter()) {
        assert_eq!(&record.id, id);
        assert_eq!(&record.kind, kind);
        assert_eq!(record.payload.as_json(), payload);
        assert!(!record.synced);
    }
}

#[tokio::test]
async fn synced_flag_survives_restart() {
    let dir = TempDir::new().expect("temp dir");

    let id = {
        let queue = file_queue(&dir);
        let id = queue
            .add(RecordKind::Farmer, json!({"name": "Ada"}).into())
            .await
            .expect("add");
        queue.mark_synced(&id).await.expect("mark synced");
        queue.close().await;
        id
    };

    let restarted = file_queue(&dir);
    assert!(restarted.get_unsynced().await.is_empty());
    let stored = restarted.get(&id).await.expect("get").expect("present");
    assert!(stored.synced);
}

#[tokio::test]
async fn mark_synced_twice_or_missing_never_errors() {
    let queue = SqliteOfflineQueue::in_memory();
    let id = queue
        .add(RecordKind::Plot, json!({"hectares": 2}).into())
        .await
        .expect("add");

    queue.mark_synced(&id).await.expect("first mark");
    queue.mark_synced(&id).await.expect("second mark");

    let missing = RecordId::generate();
    queue.mark_synced(&missing).await.expect("missing mark");

    queue.delete(&id).await.expect("delete");
    queue.mark_synced(&id).await.expect("mark after delete");

    assert!(queue.get(&id).await.expect("get").is_none());
    assert!(queue.get(&missing).await.expect("get").is_none());
    assert!(queue.get_all().await.expect("all").is_empty());
}

#[tokio::test]
async fn purge_only_removes_synced_records() {
    let queue = SqliteOfflineQueue::in_memory();
    let synced = queue.add(RecordKind::Farmer, json!({}).into()).await.expect("add");
    let pending = queue.add(RecordKind::Farmer, json!({}).into()).await.expect("add");
    queue.mark_synced(&synced).await.expect("mark");

    assert_eq!(queue.purge_synced().await.expect("purge"), 1);
    assert_eq!(queue.purge_synced().await.expect("purge again"), 0);

    let all = queue.get_all().await.expect("all");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, pending);
}

#[tokio::test]
async fn payload_shape_is_not_inspected() {
    let queue = SqliteOfflineQueue::in_memory();
    let shapes = [
        json!(null),
        json!(42),
        json!("free text"),
        json!({"nested": {"deep": [1, 2, {"x": null}]}}),
    ];

    for shape in shapes.iter().cloned() {
        queue
            .add(RecordKind::Activity, RecordPayload::new(shape))
            .await
            .expect("add");
    }

    let stored: Vec<_> = queue
        .get_unsynced()
        .await
        .into_iter()
        .map(|record| record.payload.into_inner())
        .collect();
    assert_eq!(stored, shapes.to_vec());
}

#[tokio::test]
async fn denied_storage_surfaces_on_add_and_degrades_on_scan() {
    let dir = TempDir::new().expect("temp dir");
    let blocker = dir.path().join("locked");
    std::fs::write(&blocker, b"not a directory").expect("blocker file");

    let mut config = file_database_config(&dir);
    config.url = format!("sqlite://{}?mode=rwc", blocker.join("queue.db").display());
    let queue = SqliteOfflineQueue::new(&config).expect("queue config");

    let add = queue.add(RecordKind::Farmer, json!({"name": "Ada"}).into()).await;
    assert!(matches!(add, Err(QueueError::StorageUnavailable(_))));
    assert!(queue.get_unsynced().await.is_empty());
    assert!(matches!(
        queue.try_get_unsynced().await,
        Err(QueueError::StorageUnavailable(_))
    ));
}

#[tokio::test]
async fn failed_durable_write_surfaces_as_write_error() {
    let dir = TempDir::new().expect("temp dir");
    let existing = {
        let queue = file_queue(&dir);
        let id = queue
            .add(RecordKind::Farmer, json!({"name": "Ada"}).into())
            .await
            .expect("add");
        queue.close().await;
        id
    };

    let mut config = file_database_config(&dir);
    config.url = config.url.replace("mode=rwc", "mode=ro");
    let read_only = SqliteOfflineQueue::new(&config).expect("queue config");

    let add = read_only
        .add(RecordKind::Plot, json!({"hectares": 3}).into())
        .await;
    assert!(matches!(add, Err(QueueError::StorageWriteError(_))));

    let all = read_only.get_all().await.expect("all");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, existing);
}
