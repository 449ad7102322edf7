//! Transport seam — the actual HTTP GET, behind a trait.
//!
//! The orchestrator never talks to reqwest directly; it hands the effective
//! URL and transport options to a [`Transport`] and gets back a
//! [`TransportOutcome`]. The outcome is infallible by construction —
//! network failures are data, not `Err` — which is what lets the
//! [normalizer](crate::normalize) map every raw outcome into the uniform
//! result shape.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::DEFAULT_TIMEOUT_SECS;

/// Raw response from a completed HTTP exchange.
///
/// `body_error` is set when the exchange produced a status line but the
/// body could not be retrieved (connection dropped mid-read, decode
/// failure in the HTTP layer).
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
    pub body_error: Option<String>,
}

/// Everything a transport attempt can produce.
#[derive(Debug, Clone)]
pub enum TransportOutcome {
    /// The request never completed (DNS, connect, timeout, invalid URL).
    Failed { message: String, body: String },
    /// The request completed with a status line.
    Response(RawResponse),
}

/// Outbound GET transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a single GET. `options` is the descriptor's merged
    /// `transport_options` mapping; `"timeout"` (seconds) is honoured,
    /// unknown keys are implementation-defined.
    async fn fetch_get(&self, url: &str, options: &BTreeMap<String, Value>) -> TransportOutcome;
}

/// Default [`Transport`] over a shared [`reqwest::Client`].
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Reuse an existing client (connection pooling across components).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_get(&self, url: &str, options: &BTreeMap<String, Value>) -> TransportOutcome {
        let timeout_secs = options
            .get("timeout")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let request = self
            .client
            .get(url)
            .timeout(Duration::from_secs(timeout_secs));

        match request.send().await {
            Err(e) => TransportOutcome::Failed {
                message: e.to_string(),
                body: String::new(),
            },
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => TransportOutcome::Response(RawResponse {
                        status,
                        body,
                        body_error: None,
                    }),
                    Err(e) => TransportOutcome::Response(RawResponse {
                        status,
                        body: String::new(),
                        body_error: Some(e.to_string()),
                    }),
                }
            }
        }
    }
}
