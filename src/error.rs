//! Error taxonomy and classification for the Graph API.
//!
//! The remote API reports failures two ways, interchangeably: an `"error"`
//! object inside a 200-status body, or a non-2xx HTTP status with a JSON
//! error body. [`classify`] maps both shapes onto the same closed set of
//! [`GraphError`] kinds so callers never have to care which convention a
//! given response used.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error payload from the Graph API `"error"` object.
///
/// Every field is optional: transport-level failures have no payload at
/// all, and the API omits fields freely depending on the error class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub code: Option<i64>,

    #[serde(default)]
    pub error_subcode: Option<i64>,

    /// Error class name, e.g. `"OAuthException"`.
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorPayload {
    fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Errors raised while talking to the Graph API.
///
/// `RateLimited` and `ServerUnavailable` are retryable; their `*Exhausted`
/// counterparts are raised once the retry budget for a logical request is
/// spent and are final. Everything else is fatal on first sight.
#[derive(Error, Debug)]
pub enum GraphError {
    /// Access token is invalid, expired, or revoked.
    #[error("invalid or expired access token: {0}")]
    InvalidToken(String),

    /// Page, post, or alias cannot be found.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Token lacks permission for the requested resource.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Rate limit hit; retryable while budget remains.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Rate limit retries exhausted for one logical request.
    #[error("rate limit retries exhausted after {attempts} attempts: {message}")]
    RateLimitExhausted { attempts: u32, message: String },

    /// Remote 5xx; retryable while budget remains.
    #[error("server unavailable: {0}")]
    ServerUnavailable(String),

    /// Server-error retries exhausted for one logical request.
    #[error("server retries exhausted after {attempts} attempts: {message}")]
    ServerExhausted { attempts: u32, message: String },

    /// No HTTP response at all (connect failure, timeout). Never retried.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Unclassified API error; the original payload is preserved verbatim.
    #[error("graph api error (status {status}): {}", .payload.message_or("no message"))]
    Generic { status: u16, payload: ErrorPayload },

    /// A page reference could not be resolved to a numeric id. Raised by
    /// the resolver, never by the remote API itself.
    #[error("could not resolve page id from {0:?}")]
    Resolution(String),
}

impl GraphError {
    /// True for kinds the executor may retry under its backoff policy.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GraphError::RateLimited(_) | GraphError::ServerUnavailable(_)
        )
    }
}

/// Maps an HTTP status plus optional error payload onto a [`GraphError`].
///
/// Rules are evaluated in order; the first match wins. The same mapping is
/// applied whether the error arrived inside a 200 body or as a non-2xx
/// status, so e.g. status 401 with no payload still yields `InvalidToken`.
pub fn classify(status: u16, payload: Option<&ErrorPayload>) -> GraphError {
    let code = payload.and_then(|p| p.code);
    let error_type = payload.and_then(|p| p.error_type.as_deref());
    let message = payload
        .map(|p| p.message_or(&format!("graph api returned status {status}")))
        .unwrap_or_else(|| format!("graph api returned status {status}"));

    if code == Some(190) || error_type == Some("OAuthException") || status == 401 {
        return GraphError::InvalidToken(message);
    }
    if status == 404 || code == Some(803) || message.contains("Unsupported get request") {
        return GraphError::NotFound(message);
    }
    if status == 403 || matches!(code, Some(200) | Some(10)) {
        return GraphError::PermissionDenied(message);
    }
    if status == 429 || matches!(code, Some(4) | Some(613)) {
        return GraphError::RateLimited(message);
    }
    if status >= 500 {
        return GraphError::ServerUnavailable(message);
    }

    GraphError::Generic {
        status,
        payload: payload.cloned().unwrap_or_default(),
    }
}

// ============================================================================
// Tests
// ============================================================================
