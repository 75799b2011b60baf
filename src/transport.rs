//! Production transport over a shared `reqwest` client.

use async_trait::async_trait;

use crate::config::GraphConfig;
use crate::traits::{GraphTransport, RawResponse, TransportError};

/// [`GraphTransport`] backed by a `reqwest::Client`.
///
/// The inner client holds the connection pool shared by every concurrent
/// logical request in a harvest call; `reqwest::Client` is cheap to clone
/// and safe for concurrent use.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with the configured per-attempt timeout.
    pub fn new(config: &GraphConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl GraphTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        // Error statuses carry JSON payloads the classifier needs, so the
        // body is parsed regardless of status and kept as None only when
        // it is not JSON at all.
        let body = response.json::<serde_json::Value>().await.ok();

        Ok(RawResponse { status, body })
    }
}
