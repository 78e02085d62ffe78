//! uplog Core - Log buffering domain logic
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `LogEntry`, `LogKind`, the queue wire codec
//! - **The buffer** - `LogBuffer`: queue, dedupe, persistence mirroring,
//!   and timed flush
//! - **Port definitions** - Traits for adapters: `IRemoteSink`,
//!   `IKeyValueStore`, `IIdentityProvider`
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure data with no external collaborators.
//! Ports define trait interfaces that adapter crates implement. The buffer
//! orchestrates the queue through the port interfaces and never surfaces a
//! failure to application code.

pub mod buffer;
pub mod codec;
pub mod config;
pub mod domain;
pub mod format;
pub mod ports;

pub use buffer::{LogBuffer, ANONYMOUS_USER};
pub use config::Config;
pub use domain::{BufferError, LogEntry, LogKind};
