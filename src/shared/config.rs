use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub auto_sync: bool,
    pub sync_interval_ms: u64,
    /// 0 waits on each dispatch indefinitely.
    pub dispatch_timeout_ms: u64,
    pub evict_on_sync: bool,
}

impl SyncConfig {
    pub fn sync_interval(&self) -> Duration {
        Duration::from_millis(self.sync_interval_ms)
    }

    pub fn dispatch_timeout(&self) -> Option<Duration> {
        if self.dispatch_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.dispatch_timeout_ms))
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auto_sync: true,
            sync_interval_ms: 30_000,
            dispatch_timeout_ms: 15_000,
            evict_on_sync: false,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: 1,
            connection_timeout: 30,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("FIELDSYNC_DATABASE_URL") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.database.url = v.to_string();
            }
        }
        if let Some(value) = env_u64("FIELDSYNC_DB_MAX_CONNECTIONS") {
            cfg.database.max_connections = value.clamp(1, u32::MAX as u64) as u32;
        }
        if let Ok(v) = std::env::var("FIELDSYNC_AUTO_SYNC") {
            cfg.sync.auto_sync = parse_bool(&v, cfg.sync.auto_sync);
        }
        if let Some(value) = env_u64("FIELDSYNC_SYNC_INTERVAL_MS") {
            cfg.sync.sync_interval_ms = value.max(1);
        }
        if let Some(value) = env_u64("FIELDSYNC_DISPATCH_TIMEOUT_MS") {
            cfg.sync.dispatch_timeout_ms = value;
        }
        if let Ok(v) = std::env::var("FIELDSYNC_EVICT_ON_SYNC") {
            cfg.sync.evict_on_sync = parse_bool(&v, cfg.sync.evict_on_sync);
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.sync.sync_interval_ms == 0 {
            return Err("Sync sync_interval_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_database_url() -> String {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("./data"));
    let path = base.join("fieldsync").join("queue.db");
    format!("sqlite://{}?mode=rwc", path.display())
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| parse_u64(&v))
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
