use std::fmt;

use serde::{Deserialize, Serialize};

/// Transient identifier the server assigns to a running operation.
///
/// Replica set members report integers; a mongos reports `"shard:id"`
/// strings. Only valid while the operation is running.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpId {
    Int(i64),
    Str(String),
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpId::Int(id) => write!(f, "{id}"),
            OpId::Str(id) => f.write_str(id),
        }
    }
}

impl From<&str> for OpId {
    fn from(value: &str) -> Self {
        OpId::Str(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Command,
    Query,
    Other,
}

impl OpKind {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "command" => OpKind::Command,
            "query" => OpKind::Query,
            _ => OpKind::Other,
        }
    }

    pub fn is_killable(self) -> bool {
        matches!(self, OpKind::Command | OpKind::Query)
    }
}

/// Snapshot of one active operation at scan time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub opid: OpId,
    pub kind: OpKind,
    pub client: String,
    pub secs_running: u64,
    /// Opaque payload, only ever serialized for display.
    pub command: serde_json::Value,
    pub active: bool,
}

impl Operation {
    /// Strictly greater than the threshold: an operation sitting exactly
    /// on it is left alone.
    pub fn is_eligible(&self, threshold_secs: u64) -> bool {
        self.active && self.kind.is_killable() && self.secs_running > threshold_secs
    }
}
