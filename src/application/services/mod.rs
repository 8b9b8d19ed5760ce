pub mod dispatch_registry;
pub mod sync_orchestrator;

pub use dispatch_registry::DispatchRegistry;
pub use sync_orchestrator::{SyncOrchestrator, SyncStatusSnapshot};
