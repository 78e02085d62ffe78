//! Queue wire codec
//!
//! The persisted queue mirror is a JSON array of entry objects stored as a
//! single string value in the key-value store. The codec is total in one
//! direction only: any queue encodes, but a stored string may fail to
//! decode (older formats, truncated writes), in which case the buffer
//! starts empty rather than partially populated.

use crate::domain::{BufferError, LogEntry};

/// Encodes a queue for persistence.
pub fn encode_queue(entries: &[LogEntry]) -> Result<String, BufferError> {
    serde_json::to_string(entries).map_err(|e| BufferError::Encode(e.to_string()))
}

/// Decodes a persisted queue string.
pub fn decode_queue(raw: &str) -> Result<Vec<LogEntry>, BufferError> {
    serde_json::from_str(raw).map_err(|e| BufferError::Decode(e.to_string()))
}
