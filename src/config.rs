//! Client configuration.
//!
//! The config is constructed once at startup and passed explicitly into
//! [`GraphExecutor`](crate::executor::GraphExecutor); there is no
//! process-wide client or lazily-initialized global.

use std::time::Duration;

/// Graph API version the harvester speaks.
pub const GRAPH_API_VERSION: &str = "v19.0";

/// Production API host.
pub const GRAPH_API_BASE: &str = "https://graph.facebook.com";

/// Configuration for the Graph API client.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// API host, without version segment. Overridable so tests can point
    /// at a local mock server.
    pub base_url: String,

    /// Version path segment, e.g. `"v19.0"`.
    pub api_version: String,

    /// Per-attempt timeout. Exceeding it is a transport failure and is
    /// not retried.
    pub request_timeout: Duration,

    /// Retries allowed after the initial attempt of each logical request.
    pub max_retries: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: GRAPH_API_BASE.to_string(),
            api_version: GRAPH_API_VERSION.to_string(),
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

impl GraphConfig {
    /// Overrides the API host (primarily for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the per-attempt timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Overrides the retry maximum.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Root URL for fresh requests: `{base_url}/{api_version}`.
    pub fn graph_root(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version
        )
    }
}
