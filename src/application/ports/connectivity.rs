use async_trait::async_trait;

/// Host-provided "is the runtime currently online" oracle.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_online(&self) -> bool;
}
