//! Key-value store port (driven/secondary port)
//!
//! Interface to the local persistent string store that mirrors the queue
//! across process restarts.
//!
//! ## Design Notes
//!
//! - String values only; the buffer owns the queue's wire encoding and
//!   the store never interprets what it holds.
//! - `get_string` distinguishes "key absent" (`Ok(None)`) from a read
//!   failure (`Err`); the buffer treats both as "start empty" but logs
//!   only the latter.
//! - A completed `set_string` call is the only durability guarantee the
//!   buffer waits for; there is no separate sync/flush step.

/// Port trait for local persistent string storage
#[async_trait::async_trait]
pub trait IKeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` if absent.
    async fn get_string(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_string(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Removes `key` and its value. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
}
