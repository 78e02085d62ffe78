//! LogBuffer - queue, dedupe, and timed-flush state machine
//!
//! The buffer accepts log/warn/error events, deduplicates repeated errors,
//! mirrors the queue to the key-value store after every mutation, and
//! flushes (deliver + clear) the queue to the remote sink either on a
//! recurring timer or on explicit demand.
//!
//! ## Flow
//!
//! ```text
//! caller ──→ tag + flatten ──→ dedupe (errors) ──→ append ──→ persist
//!                                                               │
//!                         timer tick / force_flush ──→ flush ───┘
//!                                  (partition, deliver, clear, persist)
//! ```
//!
//! ## Design Notes
//!
//! - Constructed once at startup and shared via `Arc`; there is no hidden
//!   global. Restarting the timer with [`start`](LogBuffer::start) cancels
//!   the previous one, so at most one timer task is active.
//! - No failure escapes to the caller: identity setup, persistence, and
//!   delivery errors are traced and swallowed. The logger must never be
//!   the cause of an application fault.
//! - The mutex guards individual queue mutations only, never a whole
//!   flush. A timer flush overlapping a forced flush observes the same
//!   queue and may double-deliver; delivery is at-least-once by contract.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, Weak},
    time::Duration,
};

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    codec,
    domain::{LogEntry, LogKind},
    format,
    ports::{IIdentityProvider, IKeyValueStore, IRemoteSink},
};

/// User id attached when the device has no signed-in user.
pub const ANONYMOUS_USER: &str = "anonymous_user";

/// In-memory queue state guarded by a single mutex.
///
/// Invariant between mutations: `seen_errors` holds exactly the hashes of
/// the error entries currently in `entries`.
struct QueueState {
    entries: Vec<LogEntry>,
    seen_errors: HashSet<String>,
}

impl QueueState {
    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            seen_errors: HashSet::new(),
        }
    }

    fn from_restored(entries: Vec<LogEntry>) -> Self {
        let seen_errors = entries
            .iter()
            .filter(|e| e.is_error())
            .filter_map(|e| e.hash.clone())
            .collect();
        Self {
            entries,
            seen_errors,
        }
    }
}

/// Buffers log events locally and forwards them to the remote sink
///
/// See the module docs for the overall flow. All public methods are safe
/// to call at any time and never return an error to the caller.
pub struct LogBuffer {
    sink: Arc<dyn IRemoteSink>,
    store: Arc<dyn IKeyValueStore>,
    /// Fixed key under which the queue mirror is persisted
    queue_key: String,
    /// Interval between automatic flush cycles
    flush_interval: Duration,
    state: Mutex<QueueState>,
    /// Token for the currently running flush timer, if any
    timer: Mutex<Option<CancellationToken>>,
    /// Handle back to the owning `Arc`, used to hand clones to spawned tasks
    weak_self: Weak<Self>,
}

impl LogBuffer {
    /// Creates the buffer, attaches identity to the sink, and restores the
    /// persisted queue.
    ///
    /// Identity attachment failures are logged and swallowed; a missing or
    /// undecodable queue mirror leaves the queue empty. Construction always
    /// succeeds. The flush timer is not started here; call
    /// [`start`](LogBuffer::start) once the buffer is wired up.
    pub async fn new(
        sink: Arc<dyn IRemoteSink>,
        store: Arc<dyn IKeyValueStore>,
        identity: Arc<dyn IIdentityProvider>,
        queue_key: impl Into<String>,
        flush_interval: Duration,
    ) -> Arc<Self> {
        let queue_key = queue_key.into();

        attach_identity(sink.as_ref(), identity.as_ref()).await;

        let state = match store.get_string(&queue_key).await {
            Ok(Some(raw)) => match codec::decode_queue(&raw) {
                Ok(entries) => {
                    info!(count = entries.len(), "Restored persisted log queue");
                    QueueState::from_restored(entries)
                }
                Err(e) => {
                    warn!(error = %e, "Discarding undecodable persisted queue");
                    QueueState::empty()
                }
            },
            Ok(None) => QueueState::empty(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted queue, starting empty");
                QueueState::empty()
            }
        };

        Arc::new_cyclic(|weak| Self {
            sink,
            store,
            queue_key,
            flush_interval,
            state: Mutex::new(state),
            timer: Mutex::new(None),
            weak_self: weak.clone(),
        })
    }

    // ========================================================================
    // Public surface
    // ========================================================================

    /// Records a plain log event.
    pub async fn log(&self, message: &str, params: &[Value]) {
        self.record(LogKind::Log, message, params).await;
    }

    /// Records a warning event.
    pub async fn warn(&self, message: &str, params: &[Value]) {
        self.record(LogKind::Warn, message, params).await;
    }

    /// Records an error event. Repeats of an already-queued error are
    /// suppressed until the queue is flushed.
    pub async fn error(&self, message: &str, params: &[Value]) {
        self.record(LogKind::Error, message, params).await;
    }

    /// Writes to local console-style output only, in debug builds.
    ///
    /// Debug events are never queued, persisted, or flushed.
    pub fn debug(&self, message: &str, params: &[Value]) {
        if cfg!(debug_assertions) {
            let params = format::flatten_params(params);
            if params.is_empty() {
                debug!(target: "uplog::console", "[DEBUG] {message}");
            } else {
                debug!(target: "uplog::console", "[DEBUG] {message} {params}");
            }
        }
    }

    /// Triggers a flush without waiting for it (fire-and-forget).
    ///
    /// Runs the same logic as the timer path; no mutual exclusion exists
    /// between the two.
    pub fn force_flush(&self) {
        if let Some(buffer) = self.weak_self.upgrade() {
            tokio::spawn(async move {
                buffer.flush().await;
            });
        }
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Appends an event to the queue and persists the mirror.
    ///
    /// Never returns an error; persistence failures are traced and the
    /// queue keeps operating in-memory.
    pub async fn record(&self, kind: LogKind, message: &str, params: &[Value]) {
        let message = format::tag_message(kind, message);
        let params = format::flatten_params(params);

        let accepted = {
            let mut state = self.state.lock().unwrap();

            if kind == LogKind::Error {
                let hash = LogEntry::fingerprint(&message, &params);
                if !state.seen_errors.insert(hash) {
                    debug!(message = %message, "Suppressing already-queued error");
                    false
                } else {
                    state.entries.push(LogEntry::new(kind, message, params));
                    true
                }
            } else {
                state.entries.push(LogEntry::new(kind, message, params));
                true
            }
        };

        if accepted {
            self.persist().await;
        }
    }

    // ========================================================================
    // Flushing
    // ========================================================================

    /// Delivers all queued entries to the remote sink and clears the queue
    /// on success.
    ///
    /// Entries are partitioned before delivery: non-errors first, then
    /// errors, each group in original queue order. Error entries are
    /// delivered twice: once as a log line and once as a recorded error.
    /// Any delivery failure leaves the queue and dedupe set untouched so
    /// the whole batch is retried on the next trigger.
    pub async fn flush(&self) {
        let snapshot = self.state.lock().unwrap().entries.clone();
        if snapshot.is_empty() {
            return;
        }

        let (errors, regular): (Vec<_>, Vec<_>) =
            snapshot.iter().partition(|entry| entry.is_error());

        match self.deliver(&regular, &errors).await {
            Ok(()) => {
                {
                    let mut state = self.state.lock().unwrap();
                    state.entries.clear();
                    state.seen_errors.clear();
                }
                self.persist().await;
                info!(delivered = snapshot.len(), "Flushed log queue");
            }
            Err(e) => {
                warn!(
                    error = %e,
                    queued = snapshot.len(),
                    "Flush failed, keeping queue for retry"
                );
            }
        }
    }

    /// Delivers the partitioned batch in order; stops at the first failure.
    async fn deliver(&self, regular: &[&LogEntry], errors: &[&LogEntry]) -> anyhow::Result<()> {
        for entry in regular {
            self.sink.log(&format::delivery_line(entry)).await?;
        }
        for entry in errors {
            self.sink.log(&format::delivery_line(entry)).await?;
            self.sink
                .record_error(&format::error_description(entry))
                .await?;
        }
        Ok(())
    }

    /// Mirrors the current queue to the key-value store.
    ///
    /// Encoding happens under the lock; the store write does not.
    async fn persist(&self) {
        let encoded = {
            let state = self.state.lock().unwrap();
            codec::encode_queue(&state.entries)
        };

        match encoded {
            Ok(raw) => {
                if let Err(e) = self.store.set_string(&self.queue_key, &raw).await {
                    warn!(error = %e, "Failed to persist log queue");
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to encode log queue");
            }
        }
    }

    // ========================================================================
    // Flush timer
    // ========================================================================

    /// Starts the recurring flush timer, cancelling any previous one.
    ///
    /// At most one timer task is active per buffer. The first flush fires
    /// one full interval after the call.
    pub fn start(&self) {
        let Some(buffer) = self.weak_self.upgrade() else {
            return;
        };

        let token = CancellationToken::new();
        if let Some(previous) = self.timer.lock().unwrap().replace(token.clone()) {
            previous.cancel();
        }

        info!(
            interval_secs = self.flush_interval.as_secs(),
            "Starting flush timer"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(buffer.flush_interval);
            // The first tick completes immediately; consume it so flushes
            // run on interval boundaries only.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        info!("Flush timer cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        buffer.flush().await;
                    }
                }
            }
        });
    }

    /// Cancels the flush timer, if one is running.
    pub fn stop(&self) {
        if let Some(token) = self.timer.lock().unwrap().take() {
            token.cancel();
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Number of entries currently queued.
    pub fn queue_len(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    /// Number of distinct errors currently queued.
    pub fn dedupe_len(&self) -> usize {
        self.state.lock().unwrap().seen_errors.len()
    }

    /// Snapshot of the queued entries, in insertion order.
    pub fn queued_entries(&self) -> Vec<LogEntry> {
        self.state.lock().unwrap().entries.clone()
    }
}

impl Drop for LogBuffer {
    fn drop(&mut self) {
        if let Some(token) = self.timer.lock().unwrap().take() {
            token.cancel();
        }
    }
}

/// Enables collection and attaches identity attributes to the sink.
///
/// Each call is attempted independently; a failure is logged and does not
/// skip the remaining attributes or abort construction.
async fn attach_identity(sink: &dyn IRemoteSink, identity: &dyn IIdentityProvider) {
    if let Err(e) = sink.set_collection_enabled(true).await {
        warn!(error = %e, "Failed to enable sink collection");
    }

    let user_id = match identity.read_user_id().await {
        Ok(Some(id)) => id,
        Ok(None) => ANONYMOUS_USER.to_string(),
        Err(e) => {
            warn!(error = %e, "Failed to read user id, attaching anonymous");
            ANONYMOUS_USER.to_string()
        }
    };
    if let Err(e) = sink.set_user_id(&user_id).await {
        warn!(error = %e, "Failed to attach user id");
    }

    match identity.read_platform().await {
        Ok(platform) => {
            if let Err(e) = sink.set_attribute("platform", &platform).await {
                warn!(error = %e, "Failed to attach platform attribute");
            }
        }
        Err(e) => warn!(error = %e, "Failed to read platform"),
    }

    match identity.read_environment().await {
        Ok(environment) => {
            if let Err(e) = sink.set_attribute("environment", &environment).await {
                warn!(error = %e, "Failed to attach environment attribute");
            }
        }
        Err(e) => warn!(error = %e, "Failed to read environment"),
    }

    if let Err(e) = sink
        .set_attribute("app_version", env!("CARGO_PKG_VERSION"))
        .await
    {
        warn!(error = %e, "Failed to attach app version attribute");
    }
}

// ============================================================================
// Unit tests
// ============================================================================
