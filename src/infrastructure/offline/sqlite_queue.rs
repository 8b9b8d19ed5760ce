use super::rows::QueuedRecordRow;
use crate::application::ports::offline_queue::OfflineQueue;
use crate::domain::entities::QueuedRecord;
use crate::domain::value_objects::{RecordId, RecordKind, RecordPayload};
use crate::shared::config::DatabaseConfig;
use crate::shared::error::QueueError;
use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::OnceCell;

const SELECT_COLUMNS: &str = "SELECT id, kind, payload, created_at, synced FROM queued_records";

struct PoolSettings {
    options: SqliteConnectOptions,
    max_connections: u32,
    acquire_timeout: Duration,
    in_memory: bool,
}

/// SQLite-backed [`OfflineQueue`].
///
/// The pool is opened on first use and migrated before any statement runs.
/// WAL journaling with `synchronous = FULL` makes every returned write durable.
pub struct SqliteOfflineQueue {
    settings: PoolSettings,
    pool: OnceCell<SqlitePool>,
    closed: AtomicBool,
}

impl SqliteOfflineQueue {
    pub fn new(config: &DatabaseConfig) -> Result<Self, QueueError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| QueueError::StorageUnavailable(format!("invalid database url: {e}")))?;

        Ok(Self::with_options(
            options,
            config.max_connections.max(1),
            Duration::from_secs(config.connection_timeout),
            config.url.contains(":memory:"),
        ))
    }

    /// Private in-memory store, gone once the queue is dropped.
    pub fn in_memory() -> Self {
        let options = SqliteConnectOptions::new().in_memory(true);
        Self::with_options(options, 1, Duration::from_secs(30), true)
    }

    fn with_options(
        options: SqliteConnectOptions,
        max_connections: u32,
        acquire_timeout: Duration,
        in_memory: bool,
    ) -> Self {
        let options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full)
            .busy_timeout(Duration::from_secs(5));

        Self {
            settings: PoolSettings {
                options,
                max_connections,
                acquire_timeout,
                in_memory,
            },
            pool: OnceCell::new(),
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
            && self.pool.get().is_some_and(|pool| !pool.is_closed())
    }

    /// Closes the pool, even one never opened. The queue stays closed; later
    /// operations fail with [`QueueError::StorageUnavailable`].
    pub async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        if let Some(pool) = self.pool.get() {
            pool.close().await;
        }
    }

    async fn pool(&self) -> Result<&SqlitePool, QueueError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(QueueError::StorageUnavailable("queue closed".to_string()));
        }
        self.pool.get_or_try_init(|| self.open()).await
    }

    async fn open(&self) -> Result<SqlitePool, QueueError> {
        let settings = &self.settings;
        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout);
        if settings.in_memory {
            // An in-memory database lives only as long as its connections.
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            ensure_parent_dir(&settings.options)?;
        }
        let pool = pool_options
            .connect_with(settings.options.clone())
            .await
            .map_err(|e| QueueError::StorageUnavailable(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| QueueError::StorageUnavailable(format!("migration failed: {e}")))?;

        tracing::info!(target: "offline::queue", "offline queue opened");
        Ok(pool)
    }

    fn decode_rows(rows: Vec<QueuedRecordRow>) -> Vec<QueuedRecord> {
        rows.into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                match QueuedRecord::try_from(row) {
                    Ok(record) => Some(record),
                    Err(err) => {
                        tracing::error!(
                            target: "offline::queue",
                            record_id = %id,
                            error = %err,
                            "skipping undecodable queued record"
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

fn ensure_parent_dir(options: &SqliteConnectOptions) -> Result<(), QueueError> {
    let filename = options.get_filename();
    if let Some(parent) = filename.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                QueueError::StorageUnavailable(format!(
                    "cannot create {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }
    Ok(())
}

#[async_trait]
impl OfflineQueue for SqliteOfflineQueue {
    async fn init(&self) -> Result<(), QueueError> {
        self.pool().await.map(|_| ())
    }

    async fn add(
        &self,
        kind: RecordKind,
        payload: RecordPayload,
    ) -> Result<RecordId, QueueError> {
        let pool = self.pool().await?;
        let record = QueuedRecord::capture(kind, payload);
        let payload_json = record
            .payload
            .to_json_string()
            .map_err(|e| QueueError::StorageWriteError(format!("payload not encodable: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO queued_records (id, kind, payload, created_at, synced)
            VALUES (?1, ?2, ?3, ?4, 0)
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.kind.as_str())
        .bind(&payload_json)
        .bind(record.created_at.timestamp_millis())
        .execute(pool)
        .await
        .map_err(QueueError::write)?;

        tracing::debug!(
            target: "offline::queue",
            record_id = %record.id,
            kind = %record.kind,
            "record queued"
        );
        Ok(record.id)
    }

    async fn try_get_unsynced(&self) -> Result<Vec<QueuedRecord>, QueueError> {
        let pool = self.pool().await?;
        let sql = format!("{SELECT_COLUMNS} WHERE synced = 0 ORDER BY rowid ASC");
        let rows = sqlx::query_as::<_, QueuedRecordRow>(&sql)
            .fetch_all(pool)
            .await
            .map_err(QueueError::read)?;

        Ok(Self::decode_rows(rows))
    }

    async fn get(&self, id: &RecordId) -> Result<Option<QueuedRecord>, QueueError> {
        let pool = self.pool().await?;
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let row = sqlx::query_as::<_, QueuedRecordRow>(&sql)
            .bind(id.as_str())
            .fetch_optional(pool)
            .await
            .map_err(QueueError::read)?;

        row.map(QueuedRecord::try_from)
            .transpose()
            .map_err(QueueError::StorageReadDegradation)
    }

    async fn mark_synced(&self, id: &RecordId) -> Result<(), QueueError> {
        let pool = self.pool().await?;
        let result = sqlx::query("UPDATE queued_records SET synced = 1 WHERE id = ?1 AND synced = 0")
            .bind(id.as_str())
            .execute(pool)
            .await
            .map_err(QueueError::write)?;

        if result.rows_affected() == 0 {
            tracing::debug!(
                target: "offline::queue",
                record_id = %id,
                "mark_synced matched no pending record"
            );
        }
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), QueueError> {
        let pool = self.pool().await?;
        sqlx::query("DELETE FROM queued_records WHERE id = ?1")
            .bind(id.as_str())
            .execute(pool)
            .await
            .map_err(QueueError::write)?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<QueuedRecord>, QueueError> {
        let pool = self.pool().await?;
        let sql = format!("{SELECT_COLUMNS} ORDER BY rowid ASC");
        let rows = sqlx::query_as::<_, QueuedRecordRow>(&sql)
            .fetch_all(pool)
            .await
            .map_err(QueueError::read)?;

        Ok(Self::decode_rows(rows))
    }

    async fn count_unsynced(&self) -> Result<u64, QueueError> {
        let pool = self.pool().await?;
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM queued_records WHERE synced = 0")
                .fetch_one(pool)
                .await
                .map_err(QueueError::read)?;
        Ok(count.max(0) as u64)
    }

    async fn purge_synced(&self) -> Result<u64, QueueError> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM queued_records WHERE synced = 1")
            .execute(pool)
            .await
            .map_err(QueueError::write)?;

        let removed = result.rows_affected();
        if removed > 0 {
            tracing::info!(target: "offline::queue", removed, "purged synced records");
        }
        Ok(removed)
    }
}
