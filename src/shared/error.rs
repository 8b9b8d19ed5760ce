use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Failures of the local durable queue.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Local storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Durable write failed: {0}")]
    StorageWriteError(String),

    #[error("Storage read degraded: {0}")]
    StorageReadDegradation(String),
}

impl QueueError {
    /// Classifies a sqlx error raised by a write statement.
    pub fn write(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
                QueueError::StorageUnavailable(err.to_string())
            }
            other => QueueError::StorageWriteError(other.to_string()),
        }
    }

    /// Classifies a sqlx error raised by a read statement.
    pub fn read(err: sqlx::Error) -> Self {
        QueueError::StorageReadDegradation(err.to_string())
    }
}

/// Failure to deliver a single record to the remote collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("No remote handler registered for kind `{0}`")]
    UnregisteredKind(String),

    #[error("Remote rejected record: {0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Dispatch timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug)]
pub enum AppError {
    Queue(QueueError),
    Dispatch(DispatchError),
    ConfigurationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Queue(err) => write!(f, "Queue error: {}", err),
            AppError::Dispatch(err) => write!(f, "Dispatch error: {}", err),
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Queue(err) => Some(err),
            AppError::Dispatch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QueueError> for AppError {
    fn from(err: QueueError) -> Self {
        AppError::Queue(err)
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        AppError::Dispatch(err)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
