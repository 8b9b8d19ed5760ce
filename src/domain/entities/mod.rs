pub mod drain_report;
pub mod queued_record;

pub use drain_report::{DrainReport, FailedDispatch};
pub use queued_record::QueuedRecord;
