//! Data model: request/cursor shapes, retry budgets, and the wire and
//! output types of a harvest call.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One logical GET against the Graph API.
///
/// Pagination continuations come back from the API as opaque absolute URLs
/// that already embed every parameter, including the access token. Modeling
/// the two cases as a tagged enum keeps "params must be empty on
/// continuation" impossible to get wrong rather than a convention.
#[derive(Debug, Clone)]
pub enum GraphRequest {
    /// Fresh call against an endpoint path (e.g. `"12345/posts"`) with
    /// explicit query parameters.
    Fresh {
        endpoint: String,
        params: Vec<(String, String)>,
    },

    /// Opaque `paging.next` URL; sent verbatim with no extra parameters.
    Continuation { url: String },
}

impl GraphRequest {
    pub fn fresh(endpoint: impl Into<String>, params: Vec<(String, String)>) -> Self {
        GraphRequest::Fresh {
            endpoint: endpoint.into(),
            params,
        }
    }

    pub fn continuation(url: impl Into<String>) -> Self {
        GraphRequest::Continuation { url: url.into() }
    }
}

/// Retry budget for a single logical request.
///
/// Every logical request gets a fresh budget — including every individual
/// page of a paginated fetch. Under sustained rate limiting this allows
/// unbounded total wall-clock time across many pages even though each page
/// stays within its own budget; that per-call isolation is deliberate and
/// callers wanting a global ceiling must impose it themselves.
#[derive(Debug, Clone)]
pub struct RetryBudget {
    max_retries: u32,
    remaining: u32,
}

impl RetryBudget {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            remaining: max_retries,
        }
    }

    /// Spends one retry, returning the backoff delay to sleep before the
    /// next attempt (`2^(max - remaining)` seconds: 1 s, 2 s, 4 s, ...),
    /// or `None` when the budget is exhausted.
    pub fn try_consume(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        let delay = Duration::from_secs(1u64 << (self.max_retries - self.remaining));
        self.remaining -= 1;
        Some(delay)
    }

    /// Total attempts issued so far, counting the initial one.
    pub fn attempts_made(&self) -> u32 {
        self.max_retries - self.remaining + 1
    }
}

/// A post as returned by the `/{page_id}/posts` listing.
///
/// Only `id` is required; the harvester consumes posts solely to extract
/// ids and count them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,

    #[serde(default)]
    pub created_time: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub permalink_url: Option<String>,
}

/// A comment as returned by the `/{post_id}/comments` listing, before
/// sanitization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawComment {
    pub id: String,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub from: Option<CommentAuthor>,

    #[serde(default)]
    pub created_time: Option<String>,
}

/// The `from` object on a comment. Both fields may be withheld depending
/// on the commenter's privacy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentAuthor {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

/// A harvested comment with sanitized text. `text` is always non-empty;
/// comments that sanitize down to nothing are dropped before this type is
/// constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: String,
    pub post_id: String,
    pub text: String,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub created_time: Option<String>,
}

/// The sole output artifact of a harvest call.
///
/// `comments` is deduplicated by `comment_id` (first occurrence kept) in
/// stable post order, and `total_fetched` always equals `comments.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestResult {
    pub page_id: String,
    pub posts_scanned: usize,
    pub total_fetched: usize,
    pub comments: Vec<Comment>,
}

// ============================================================================
// Tests
// ============================================================================
