//! Generic cursor-following pagination.
//!
//! Post listing and comment listing share the exact same page-walking
//! behavior; the only differences are the endpoint and field parameters
//! the caller supplies.

use tracing::debug;

use crate::error::GraphError;
use crate::executor::GraphExecutor;
use crate::model::GraphRequest;

/// Items requested per page when unbounded, and the upper bound for the
/// per-page limit otherwise.
const PAGE_SIZE: usize = 100;

/// Walks a paginated listing, accumulating `data` items in order.
///
/// Requests `min(cap, 100)` items per page when `cap` is set, else 100.
/// Follows `paging.next` continuations (which are self-contained, so no
/// further params are sent) until either the cursor runs out or the
/// running total reaches `cap`; no cursor past that point is fetched. The
/// result is truncated to exactly `cap` items when bounded — a page may
/// overshoot, in which case only the tail excess is dropped.
///
/// # Errors
///
/// Any request failure aborts the walk and propagates unmodified; each
/// page carries its own fresh retry budget inside the executor.
pub async fn paginate(
    executor: &GraphExecutor,
    endpoint: &str,
    mut params: Vec<(String, String)>,
    cap: Option<usize>,
) -> Result<Vec<serde_json::Value>, GraphError> {
    let per_page = cap.map_or(PAGE_SIZE, |c| c.min(PAGE_SIZE));
    params.push(("limit".to_string(), per_page.to_string()));

    let mut request = GraphRequest::fresh(endpoint, params);
    let mut items: Vec<serde_json::Value> = Vec::new();

    loop {
        let body = executor.execute(&request).await?;

        // A page without a data array contributes nothing.
        if let Some(page_items) = body.get("data").and_then(|d| d.as_array()) {
            items.extend(page_items.iter().cloned());
        }
        debug!(endpoint, fetched = items.len(), "accumulated page");

        if cap.is_some_and(|c| items.len() >= c) {
            break;
        }

        match body
            .get("paging")
            .and_then(|p| p.get("next"))
            .and_then(|n| n.as_str())
        {
            Some(next) => request = GraphRequest::continuation(next),
            None => break,
        }
    }

    if let Some(c) = cap {
        items.truncate(c);
    }
    Ok(items)
}

// ============================================================================
// Tests
// ============================================================================
