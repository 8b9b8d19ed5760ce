pub mod connectivity;
pub mod offline_queue;
pub mod record_inserter;
pub mod sync_events;

pub use connectivity::ConnectivityProbe;
pub use offline_queue::OfflineQueue;
pub use record_inserter::RecordInserter;
pub use sync_events::SyncEventEmitter;
