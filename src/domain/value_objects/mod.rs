pub mod record_id;
pub mod record_kind;
pub mod record_payload;

pub use record_id::RecordId;
pub use record_kind::RecordKind;
pub use record_payload::RecordPayload;
