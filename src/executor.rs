//! Request execution: one logical GET with classification, retry, and
//! exponential backoff.

use std::sync::Arc;
use tokio::time::sleep;
use tracing::debug;

use crate::config::GraphConfig;
use crate::error::{classify, ErrorPayload, GraphError};
use crate::model::{GraphRequest, RetryBudget};
use crate::traits::GraphTransport;
use url::Url;

/// Executes logical requests against the Graph API.
///
/// Each call to [`execute`](GraphExecutor::execute) gets a fresh
/// [`RetryBudget`]. Retryable kinds (`RateLimited`, `ServerUnavailable`)
/// are reissued after a backoff sleep until the budget is spent; the sleep
/// suspends only this logical request, never sibling tasks. Transport
/// failures are raised immediately without retry.
pub struct GraphExecutor {
    transport: Arc<dyn GraphTransport>,
    config: GraphConfig,
}

impl GraphExecutor {
    pub fn new(transport: Arc<dyn GraphTransport>, config: GraphConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Resolves a request to the absolute URL to fetch. Continuation URLs
    /// are used verbatim; fresh requests are rooted at the configured
    /// graph host and version.
    fn build_url(&self, request: &GraphRequest) -> Result<String, GraphError> {
        match request {
            GraphRequest::Continuation { url } => Ok(url.clone()),
            GraphRequest::Fresh { endpoint, params } => {
                let raw = format!(
                    "{}/{}",
                    self.config.graph_root(),
                    endpoint.trim_start_matches('/')
                );
                let mut url = Url::parse(&raw)
                    .map_err(|e| GraphError::Transport(format!("invalid request url: {e}")))?;
                url.query_pairs_mut()
                    .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                Ok(url.into())
            }
        }
    }

    /// Issues one logical GET and returns the parsed JSON body unchanged.
    ///
    /// # Errors
    ///
    /// Returns the classified [`GraphError`] on failure. `RateLimited` and
    /// `ServerUnavailable` are retried with backoff first; when the budget
    /// runs out they surface as the distinct `RateLimitExhausted` /
    /// `ServerExhausted` kinds carrying the total attempt count.
    pub async fn execute(&self, request: &GraphRequest) -> Result<serde_json::Value, GraphError> {
        let url = self.build_url(request)?;
        let mut budget = RetryBudget::new(self.config.max_retries);

        loop {
            let response = self
                .transport
                .get(&url)
                .await
                .map_err(|e| GraphError::Transport(e.to_string()))?;

            // The API reports errors both as 200 bodies with an "error"
            // object and as non-2xx statuses; both go through classify.
            let payload = response
                .body
                .as_ref()
                .and_then(|body| body.get("error"))
                .and_then(|err| serde_json::from_value::<ErrorPayload>(err.clone()).ok());

            if payload.is_none() && (200..300).contains(&response.status) {
                return Ok(response.body.unwrap_or(serde_json::Value::Null));
            }

            let err = classify(response.status, payload.as_ref());
            if !err.is_retryable() {
                return Err(err);
            }

            match budget.try_consume() {
                Some(delay) => {
                    // Request URLs embed the access token and are never logged.
                    debug!(
                        status = response.status,
                        attempt = budget.attempts_made(),
                        delay_secs = delay.as_secs(),
                        "retryable graph error, backing off"
                    );
                    sleep(delay).await;
                }
                None => {
                    let attempts = budget.attempts_made();
                    return Err(match err {
                        GraphError::RateLimited(message) => {
                            GraphError::RateLimitExhausted { attempts, message }
                        }
                        GraphError::ServerUnavailable(message) => {
                            GraphError::ServerExhausted { attempts, message }
                        }
                        other => other,
                    });
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
