//! uplog Sink - HTTP crash-reporting backend adapter
//!
//! Implements the [`IRemoteSink`] port over a JSON HTTP API: log lines go
//! to `POST /v1/logs`, error records to `POST /v1/errors`. Identity
//! attributes set at initialization are kept client-side and attached to
//! every payload.

pub mod http_sink;

pub use http_sink::HttpSink;

pub use uplog_core::ports::IRemoteSink;
