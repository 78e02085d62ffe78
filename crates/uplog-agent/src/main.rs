//! uplog Agent - Background log forwarding service
//!
//! Wires the file store, host identity, and HTTP sink into a [`LogBuffer`],
//! starts the recurring flush timer, and runs until SIGTERM/SIGINT. On
//! shutdown the timer is cancelled and one final flush is attempted so the
//! queue is as empty as the backend allows.
//!
//! # Architecture
//!
//! The agent owns the buffer explicitly and hands out `Arc` clones; there
//! is no hidden global. A `CancellationToken` carries the shutdown signal
//! from the signal handlers to the main loop.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uplog_core::{config::Config, LogBuffer};
use uplog_host::HostIdentity;
use uplog_sink::HttpSink;
use uplog_store::FileStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = Config::default_path();
    let config = Config::load_or_default(&config_path);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    info!(config_path = %config_path.display(), "Loaded configuration");

    let buffer = build_buffer(&config).await?;
    buffer.start();
    buffer
        .log("uplog agent started", &[json!(env!("CARGO_PKG_VERSION"))])
        .await;

    let shutdown = CancellationToken::new();
    spawn_signal_handlers(shutdown.clone());

    shutdown.cancelled().await;

    info!("Shutting down, flushing remaining entries");
    buffer.stop();
    buffer.log("uplog agent stopping", &[]).await;
    buffer.flush().await;
    if buffer.queue_len() > 0 {
        warn!(
            queued = buffer.queue_len(),
            "Final flush incomplete, entries remain persisted for next run"
        );
    }

    Ok(())
}

/// Constructs the buffer from configuration: store, identity, sink, queue.
async fn build_buffer(config: &Config) -> Result<Arc<LogBuffer>> {
    let store = Arc::new(FileStore::new(config.store.dir.clone()));
    let identity = Arc::new(HostIdentity::new(store.clone()));
    let sink = Arc::new(HttpSink::new(config.sink.base_url.clone()));

    info!(
        store_dir = %config.store.dir.display(),
        sink = %config.sink.base_url,
        flush_interval_secs = config.buffer.flush_interval,
        "Starting uplog agent"
    );

    Ok(LogBuffer::new(
        sink,
        store,
        identity,
        config.buffer.queue_key.clone(),
        Duration::from_secs(config.buffer.flush_interval),
    )
    .await)
}

/// Triggers the token on SIGINT or SIGTERM.
fn spawn_signal_handlers(shutdown: CancellationToken) {
    tokio::spawn(async move {
        let sigterm = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .context("Failed to install SIGTERM handler")
            {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    warn!(error = %e, "SIGTERM handler unavailable, relying on SIGINT");
                    std::future::pending::<()>().await;
                }
            }
        };

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!(error = %e, "SIGINT handler failed");
                }
                info!("Received SIGINT");
            }
            _ = sigterm => {
                info!("Received SIGTERM");
            }
        }

        shutdown.cancel();
    });
}
