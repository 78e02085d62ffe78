//! Domain entities for the log buffer
//!
//! Contains the queued event representation ([`LogEntry`], [`LogKind`]) and
//! the domain error types. Entities are pure data with serde derives; all
//! behavior lives in the buffer and its ports.

pub mod entry;
pub mod errors;

pub use entry::{LogEntry, LogKind};
pub use errors::BufferError;
