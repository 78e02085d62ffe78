//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are the trait boundaries the buffer core depends on; their
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IRemoteSink`] - Remote crash/log-reporting backend
//! - [`IKeyValueStore`] - Local persistent string store
//! - [`IIdentityProvider`] - Device/user identity read at initialization

pub mod identity;
pub mod kv_store;
pub mod remote_sink;

pub use identity::IIdentityProvider;
pub use kv_store::IKeyValueStore;
pub use remote_sink::IRemoteSink;
