// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the remote document store.
//!
//! Talks to a JSONBin-style bin API: `GET {base}/{bin}/latest` returns the
//! stored document wrapped in a `record` envelope, `PUT {base}/{bin}`
//! replaces it whole. Handles authentication, per-request timeouts, and
//! transient error retry.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use campusfix_core::normalize::document_from_value;
use campusfix_core::order::OrderDocument;
use campusfix_core::CampusfixError;

/// HTTP client for remote document communication.
///
/// Manages the master-key header, connection pooling, and retry logic for
/// transient errors (429, 500, 502, 503).
#[derive(Debug, Clone)]
pub struct RemoteDocClient {
    client: reqwest::Client,
    base_url: String,
    bin_id: String,
    timeout: Duration,
    max_retries: u32,
}

impl RemoteDocClient {
    /// Creates a new remote document client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the bin API, without a trailing slash
    /// * `bin_id` - Identifier of the document bin
    /// * `api_key` - Master key sent with every request
    /// * `timeout_secs` - Per-request timeout in seconds
    pub fn new(
        base_url: String,
        bin_id: String,
        api_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, CampusfixError> {
        let mut headers = HeaderMap::new();
        let mut master_key = HeaderValue::from_str(api_key)
            .map_err(|e| CampusfixError::Config(format!("invalid API key header value: {e}")))?;
        master_key.set_sensitive(true);
        headers.insert("X-Master-Key", master_key);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let timeout = Duration::from_secs(timeout_secs);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| CampusfixError::BackendUnavailable {
                backend: "remote",
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bin_id,
            timeout,
            max_retries: 1,
        })
    }

    /// Fetch the latest stored document.
    ///
    /// On transient errors, retries once after a 1-second delay. The
    /// response is unwrapped from its `record` envelope and normalized to
    /// the canonical schema.
    pub async fn fetch_document(&self) -> Result<OrderDocument, CampusfixError> {
        let url = format!("{}/{}/latest", self.base_url, self.bin_id);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying document fetch after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| self.request_error(e))?;

            let status = response.status();
            debug!(status = %status, attempt, "fetch response received");

            if status.is_success() {
                let value: serde_json::Value =
                    response
                        .json()
                        .await
                        .map_err(|e| CampusfixError::BackendUnavailable {
                            backend: "remote",
                            message: format!("failed to read response body: {e}"),
                            source: Some(Box::new(e)),
                        })?;
                let record = match value {
                    serde_json::Value::Object(mut map) if map.contains_key("record") => map
                        .remove("record")
                        .unwrap_or(serde_json::Value::Null),
                    other => other,
                };
                return document_from_value(record);
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(status_error(status, body));
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        Err(last_error.unwrap_or_else(|| CampusfixError::BackendUnavailable {
            backend: "remote",
            message: "document fetch failed after retries".into(),
            source: None,
        }))
    }

    /// Replace the stored document with `document`.
    ///
    /// On transient errors, retries once after a 1-second delay.
    pub async fn replace_document(&self, document: &OrderDocument) -> Result<(), CampusfixError> {
        let url = format!("{}/{}", self.base_url, self.bin_id);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying document replace after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .put(&url)
                .json(document)
                .send()
                .await
                .map_err(|e| self.request_error(e))?;

            let status = response.status();
            debug!(status = %status, attempt, "replace response received");

            if status.is_success() {
                return Ok(());
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(status_error(status, body));
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        Err(last_error.unwrap_or_else(|| CampusfixError::BackendUnavailable {
            backend: "remote",
            message: "document replace failed after retries".into(),
            source: None,
        }))
    }

    fn request_error(&self, e: reqwest::Error) -> CampusfixError {
        if e.is_timeout() {
            CampusfixError::Timeout {
                duration: self.timeout,
            }
        } else {
            CampusfixError::BackendUnavailable {
                backend: "remote",
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}

fn status_error(status: reqwest::StatusCode, body: String) -> CampusfixError {
    CampusfixError::BackendUnavailable {
        backend: "remote",
        message: format!("remote API returned {status}: {body}"),
        source: None,
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}
