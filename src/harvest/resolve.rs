//! Page reference resolution.
//!
//! Callers hand over whatever identifies a page to them: a numeric id, a
//! vanity handle, or a full URL copied out of a browser. Resolution
//! normalizes that into the canonical numeric page id, hitting the API at
//! most once (and not at all for ids that are already numeric).

use tracing::debug;
use url::Url;

use crate::error::GraphError;
use crate::executor::GraphExecutor;
use crate::model::GraphRequest;

/// Extracts the candidate id or handle from a raw page reference.
///
/// URLs yield their `id` query parameter when present, else the last
/// non-empty path segment. Anything else passes through trimmed.
pub fn normalize_page_reference(reference: &str) -> String {
    let reference = reference.trim();
    if reference.starts_with("http") {
        if let Ok(parsed) = Url::parse(reference) {
            if let Some((_, id)) = parsed.query_pairs().find(|(k, _)| k == "id") {
                if !id.is_empty() {
                    return id.into_owned();
                }
            }
            if let Some(segment) = parsed
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            {
                return segment.to_string();
            }
        }
    }
    reference.to_string()
}

/// Resolves a page reference to its canonical numeric id.
///
/// Purely numeric references return unchanged with zero network calls.
/// Anything else costs exactly one `fields=id` lookup on the normalized
/// handle.
///
/// # Errors
///
/// Remote failures propagate as their classified [`GraphError`] kind. A
/// well-formed response that lacks an `id` field is
/// [`GraphError::Resolution`], which is distinct from any remote kind.
pub async fn resolve_page_id(
    executor: &GraphExecutor,
    reference: &str,
    access_token: &str,
) -> Result<String, GraphError> {
    let candidate = normalize_page_reference(reference);
    if is_numeric_id(&candidate) {
        return Ok(candidate);
    }

    debug!(handle = %candidate, "resolving page handle to id");
    let request = GraphRequest::fresh(
        candidate.clone(),
        vec![
            ("fields".to_string(), "id".to_string()),
            ("access_token".to_string(), access_token.to_string()),
        ],
    );
    let body = executor.execute(&request).await?;

    match body.get("id") {
        Some(serde_json::Value::String(id)) => Ok(id.clone()),
        Some(serde_json::Value::Number(id)) => Ok(id.to_string()),
        _ => Err(GraphError::Resolution(reference.to_string())),
    }
}

fn is_numeric_id(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.bytes().all(|b| b.is_ascii_digit())
}

// ============================================================================
// Tests
// ============================================================================
