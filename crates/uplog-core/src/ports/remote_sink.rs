//! Remote sink port (driven/secondary port)
//!
//! Interface to the crash-reporting backend that eventually receives the
//! buffered events. The buffer treats it as an opaque sink: textual log
//! lines in, structured error records in.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because delivery errors are adapter-specific
//!   (HTTP status codes, connection failures) and the buffer only needs
//!   to know "did this batch make it".
//! - Delivery must be tolerant of duplicates: a flush that fails midway
//!   is retried wholesale on the next trigger, so the same entry may be
//!   delivered more than once (at-least-once, not exactly-once).
//! - The `set_*` calls are made once at buffer initialization; failures
//!   there are logged and swallowed by the caller.

/// Port trait for the remote crash/log-reporting backend
#[async_trait::async_trait]
pub trait IRemoteSink: Send + Sync {
    /// Enables or disables collection on the backend.
    async fn set_collection_enabled(&self, enabled: bool) -> anyhow::Result<()>;

    /// Associates subsequent reports with a user id.
    async fn set_user_id(&self, user_id: &str) -> anyhow::Result<()>;

    /// Attaches a key/value attribute to subsequent reports.
    async fn set_attribute(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Delivers a single formatted log line.
    async fn log(&self, line: &str) -> anyhow::Result<()>;

    /// Records an error with the given description.
    ///
    /// Independent of [`log`](IRemoteSink::log): an error entry is
    /// delivered through both calls during a flush.
    async fn record_error(&self, description: &str) -> anyhow::Result<()>;
}
