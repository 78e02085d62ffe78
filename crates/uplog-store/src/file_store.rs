//! File-backed key-value store
//!
//! Each key maps to one text file in the store directory. Keys are
//! sanitized to filesystem-safe names before use; the original key is
//! never needed for reads because lookups sanitize the same way.

use std::path::{Path, PathBuf};

use tracing::debug;
use uplog_core::ports::IKeyValueStore;

use crate::error::StoreError;

/// Key-value store backed by one file per key.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Returns the default store directory.
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("uplog")
    }

    /// Returns the store directory path.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", sanitize_key(key)))
    }
}

#[async_trait::async_trait]
impl IKeyValueStore for FileStore {
    async fn get_string(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.key_path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Read {
                key: key.to_string(),
                source: e,
            }
            .into()),
        }
    }

    async fn set_string(&self, key: &str, value: &str) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::CreateDir {
                dir: self.dir.clone(),
                source: e,
            })?;

        let path = self.key_path(key);
        tokio::fs::write(&path, value)
            .await
            .map_err(|e| StoreError::Write {
                key: key.to_string(),
                source: e,
            })?;

        debug!(key = %key, bytes = value.len(), "Stored value");
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        let path = self.key_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Delete {
                key: key.to_string(),
                source: e,
            }
            .into()),
        }
    }
}

/// Maps a key to a filesystem-safe file stem.
///
/// Alphanumerics, dots, dashes, and underscores pass through; everything
/// else becomes an underscore. Distinct keys can collide after
/// sanitization; callers use fixed literal keys so this never arises in
/// practice.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let (_dir, store) = store();
        assert!(store.get_string("absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let (_dir, store) = store();
        store.set_string("uplog.queue", "[]").await.unwrap();
        assert_eq!(
            store.get_string("uplog.queue").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let (_dir, store) = store();
        store.set_string("k", "first").await.unwrap();
        store.set_string("k", "second").await.unwrap();
        assert_eq!(store.get_string("k").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_delete_removes_key() {
        let (_dir, store) = store();
        store.set_string("k", "v").await.unwrap();
        store.delete("k").await.unwrap();
        assert!(store.get_string("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let (_dir, store) = store();
        store.delete("never-written").await.unwrap();
    }

    #[tokio::test]
    async fn test_creates_directory_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::new(nested.clone());

        store.set_string("k", "v").await.unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("uplog.queue"), "uplog.queue");
        assert_eq!(sanitize_key("a/b c"), "a_b_c");
        assert_eq!(sanitize_key("user-id_2"), "user-id_2");
    }

    #[test]
    fn test_default_dir_ends_with_uplog() {
        assert!(FileStore::default_dir().ends_with("uplog"));
    }
}
