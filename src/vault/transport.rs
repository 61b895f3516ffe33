//! Single-shot JSON POST exchange with the Vault HTTP API.
//!
//! There is no retry: any failure is returned to the caller and ends the run.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::errors::{Result, VaultCertError};

/// Budget for connecting, sending and reading the full response.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP transport shared by the login and issue calls.
#[derive(Debug, Clone)]
pub struct VaultTransport {
    client: Client,
    timeout: Duration,
}

impl VaultTransport {
    /// Build a transport whose requests fail after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            VaultCertError::config_with_source("Failed to build HTTP client", Box::new(e))
        })?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST `payload` as JSON to `url` and return the whole response body.
    ///
    /// Only `200 OK` counts as success.
    pub async fn exchange<T>(&self, url: &str, payload: &T, headers: HeaderMap) -> Result<Bytes>
    where
        T: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .headers(headers)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        info!(url = %url, status_code = status.as_u16(), "Response: {}", status);

        let response_headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| self.classify(url, e))?;
        debug!(
            url = %url,
            headers = ?response_headers,
            body = %String::from_utf8_lossy(&body),
            "Response body"
        );

        if status != StatusCode::OK {
            error!(url = %url, status_code = status.as_u16(), "Status code was not 200");
            return Err(VaultCertError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(body)
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> VaultCertError {
        if err.is_timeout() {
            error!(url = %url, timeout_ms = self.timeout.as_millis() as u64, "Request timed out");
            return VaultCertError::Timeout {
                url: url.to_string(),
                duration_ms: self.timeout.as_millis() as u64,
            };
        }

        error!(url = %url, error = %err, "Failed to exchange POST request for a response");
        VaultCertError::transport(url, err.to_string())
    }
}
