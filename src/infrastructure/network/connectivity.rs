use crate::application::ports::connectivity::ConnectivityProbe;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Settable online/offline signal. Clones share the same state, so the host
/// keeps one clone to feed connectivity events into.
#[derive(Debug, Clone)]
pub struct ConnectivityFlag {
    online: Arc<AtomicBool>,
}

impl ConnectivityFlag {
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    pub fn online() -> Self {
        Self::new(true)
    }

    pub fn offline() -> Self {
        Self::new(false)
    }

    pub fn set_online(&self, online: bool) {
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous != online {
            tracing::info!(target: "offline::sync", online, "connectivity changed");
        }
    }

    pub fn get(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

impl Default for ConnectivityFlag {
    fn default() -> Self {
        Self::offline()
    }
}

#[async_trait]
impl ConnectivityProbe for ConnectivityFlag {
    async fn is_online(&self) -> bool {
        self.get()
    }
}
