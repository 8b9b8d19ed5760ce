use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Domain entity a queued payload represents. Routing key at sync time.
///
/// `Unknown` carries a stored tag this build does not recognise, so scans of
/// the queue never fail on it. Such records cannot be dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Farmer,
    Plot,
    Activity,
    Batch,
    Unknown(String),
}

impl RecordKind {
    /// Every kind this build knows how to route.
    pub const KNOWN: [RecordKind; 4] = [
        RecordKind::Farmer,
        RecordKind::Plot,
        RecordKind::Activity,
        RecordKind::Batch,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            RecordKind::Farmer => "farmer",
            RecordKind::Plot => "plot",
            RecordKind::Activity => "activity",
            RecordKind::Batch => "batch",
            RecordKind::Unknown(value) => value.as_str(),
        }
    }
}

impl From<&str> for RecordKind {
    fn from(value: &str) -> Self {
        match value {
            "farmer" => RecordKind::Farmer,
            "plot" => RecordKind::Plot,
            "activity" => RecordKind::Activity,
            "batch" => RecordKind::Batch,
            other => RecordKind::Unknown(other.to_string()),
        }
    }
}

impl From<String> for RecordKind {
    fn from(value: String) -> Self {
        RecordKind::from(value.as_str())
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RecordKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(RecordKind::from(value))
    }
}
