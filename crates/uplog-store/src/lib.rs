//! uplog Store - File-backed key-value persistence
//!
//! Implements the [`IKeyValueStore`] port over a directory of one-file-per-key
//! text files, the same on-disk scheme the daemon uses for its local data
//! under `~/.local/share/uplog/`.

pub mod error;
pub mod file_store;

pub use error::StoreError;
pub use file_store::FileStore;

pub use uplog_core::ports::IKeyValueStore;
