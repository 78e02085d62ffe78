//! Store adapter error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the file-backed key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store directory could not be created
    #[error("Failed to create store directory {dir}: {source}")]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A key file could not be read
    #[error("Failed to read key '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A key file could not be written
    #[error("Failed to write key '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A key file could not be removed
    #[error("Failed to delete key '{key}': {source}")]
    Delete {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_key() {
        let err = StoreError::Read {
            key: "uplog.queue".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("uplog.queue"));
    }
}
