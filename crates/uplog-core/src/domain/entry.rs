//! Queued log event representation
//!
//! A [`LogEntry`] is immutable once created. Its wire form (the persisted
//! queue mirror) is a JSON object with fields `type`, `message`, `params`,
//! `timestamp`, and, for errors only, `hash`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Kind of a queued log event
///
/// Serialized as the literal tags `log`, `warn`, `error` in the persisted
/// queue's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Log,
    Warn,
    Error,
}

impl LogKind {
    /// Returns the bracketed tag prefixed to messages of this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            LogKind::Log => "[LOG]",
            LogKind::Warn => "[WARN]",
            LogKind::Error => "[ERROR]",
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogKind::Log => "log",
            LogKind::Warn => "warn",
            LogKind::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// A single buffered log event
///
/// Created by the buffer with the current timestamp; never mutated after
/// construction. Error entries additionally carry a dedupe fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Event kind (`log`, `warn`, or `error` on the wire)
    #[serde(rename = "type")]
    pub kind: LogKind,
    /// Message text, already prefixed with the bracketed kind tag
    pub message: String,
    /// Caller-supplied arguments flattened to a single string
    pub params: String,
    /// Creation time, milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Dedupe fingerprint, present only for error entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl LogEntry {
    /// Creates a new entry stamped with the current time.
    ///
    /// Error entries receive a fingerprint derived from the message and
    /// params; other kinds carry no fingerprint.
    pub fn new(kind: LogKind, message: String, params: String) -> Self {
        let hash = match kind {
            LogKind::Error => Some(Self::fingerprint(&message, &params)),
            _ => None,
        };
        Self {
            kind,
            message,
            params,
            timestamp: Utc::now().timestamp_millis(),
            hash,
        }
    }

    /// Dedupe fingerprint for an error: message and params joined by a
    /// literal colon.
    ///
    /// Deliberately a plain concatenation. Two distinct (message, params)
    /// pairs can collide when either string contains a colon at a boundary;
    /// changing this would change which repeats are suppressed.
    pub fn fingerprint(message: &str, params: &str) -> String {
        format!("{message}:{params}")
    }

    /// Returns true for error entries.
    pub fn is_error(&self) -> bool {
        self.kind == LogKind::Error
    }
}
