use async_trait::async_trait;
use thiserror::Error;

/// Raw outcome of one HTTP attempt: the status line plus the body parsed
/// as JSON when possible. Error statuses still carry their JSON error
/// payloads here so the classifier can see them.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Option<serde_json::Value>,
}

/// Failure before any HTTP response was obtained. Never retried: the
/// executor raises these as fatal immediately.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),
}

/// One GET of an absolute URL.
///
/// This is the seam between the retry/classification logic and the actual
/// HTTP stack: production uses a shared `reqwest` client, tests substitute
/// scripted responses. Implementations must be safe for concurrent use by
/// many in-flight logical requests within one harvest call.
#[async_trait]
pub trait GraphTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError>;
}
