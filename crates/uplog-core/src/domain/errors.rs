//! Domain error types

use thiserror::Error;

/// Errors produced by the queue wire codec
///
/// These never reach application callers; the buffer catches them at the
/// persistence boundary and continues in-memory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The queue could not be serialized for persistence
    #[error("Failed to encode queue: {0}")]
    Encode(String),

    /// A persisted queue string could not be deserialized
    #[error("Failed to decode persisted queue: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BufferError::Decode("unexpected end of input".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to decode persisted queue: unexpected end of input"
        );
    }

    #[test]
    fn test_error_equality() {
        let a = BufferError::Encode("x".to_string());
        let b = BufferError::Encode("x".to_string());
        assert_eq!(a, b);
        assert_ne!(a, BufferError::Encode("y".to_string()));
    }
}
