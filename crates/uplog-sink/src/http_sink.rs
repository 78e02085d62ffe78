//! HTTP client for the crash-reporting backend
//!
//! Wraps `reqwest::Client` with base URL construction and the client-side
//! identity state the backend expects on every payload.
//!
//! ## Design Notes
//!
//! - Collection starts disabled; until `set_collection_enabled(true)` the
//!   delivery calls are local no-ops that succeed. This mirrors an opt-out
//!   backend SDK: nothing leaves the device unless collection is on.
//! - A non-2xx response is a delivery failure. The buffer relies on that
//!   to keep its queue for retry, so the sink never maps an error status
//!   to `Ok`.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
    time::Duration,
};

use anyhow::Context;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};
use uplog_core::ports::IRemoteSink;

/// Path for log line delivery
const LOGS_PATH: &str = "/v1/logs";

/// Path for error record delivery
const ERRORS_PATH: &str = "/v1/errors";

/// Request timeout for deliveries
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP sink for the crash-reporting backend
pub struct HttpSink {
    client: Client,
    base_url: String,
    enabled: AtomicBool,
    user_id: Mutex<Option<String>>,
    attributes: Mutex<HashMap<String, String>>,
}

impl HttpSink {
    /// Creates a sink pointing at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            enabled: AtomicBool::new(false),
            user_id: Mutex::new(None),
            attributes: Mutex::new(HashMap::new()),
        }
    }

    /// Returns whether collection is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Builds the identity envelope attached to every payload.
    fn envelope(&self) -> serde_json::Value {
        json!({
            "user_id": self.user_id.lock().unwrap().clone(),
            "attributes": self.attributes.lock().unwrap().clone(),
        })
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> anyhow::Result<()> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Backend rejected delivery");
            anyhow::bail!("POST {url} returned {status}");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl IRemoteSink for HttpSink {
    async fn set_collection_enabled(&self, enabled: bool) -> anyhow::Result<()> {
        self.enabled.store(enabled, Ordering::SeqCst);
        debug!(enabled, "Collection toggled");
        Ok(())
    }

    async fn set_user_id(&self, user_id: &str) -> anyhow::Result<()> {
        *self.user_id.lock().unwrap() = Some(user_id.to_string());
        Ok(())
    }

    async fn set_attribute(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.attributes
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn log(&self, line: &str) -> anyhow::Result<()> {
        if !self.is_enabled() {
            debug!("Collection disabled, dropping log line");
            return Ok(());
        }

        let mut body = self.envelope();
        body["line"] = json!(line);
        self.post(LOGS_PATH, body).await
    }

    async fn record_error(&self, description: &str) -> anyhow::Result<()> {
        if !self.is_enabled() {
            debug!("Collection disabled, dropping error record");
            return Ok(());
        }

        let mut body = self.envelope();
        body["description"] = json!(description);
        self.post(ERRORS_PATH, body).await
    }
}
