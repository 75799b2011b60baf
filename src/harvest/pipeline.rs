//! Comment harvest orchestration.
//!
//! This module provides the [`CommentHarvester`] coordinator that drives a
//! full harvest call:
//! - Page resolution and post listing (fail-fast)
//! - Bounded-concurrency fan-out of per-post comment retrieval
//! - Per-post failure isolation with structured warnings
//! - Sanitization, order-stable merge, and dedup by comment id

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::error::GraphError;
use crate::executor::GraphExecutor;
use crate::harvest::paginate::paginate;
use crate::harvest::resolve::resolve_page_id;
use crate::harvest::sanitize::sanitize_comment_text;
use crate::model::{Comment, HarvestResult, Post, RawComment};

const POST_FIELDS: &str = "id,created_time,message,permalink_url";
const COMMENT_FIELDS: &str = "id,from,message,created_time";

/// Tuning knobs for one harvest call.
///
/// Defaults match the service the harvester was built for: 10 posts,
/// a 500-comment budget, no time window, 3 concurrent comment fetches.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Maximum posts scanned from the page feed.
    pub max_posts: usize,

    /// Overall comment budget, divided evenly across scanned posts.
    pub max_comments: usize,

    /// Optional `since` filter on the post listing (ISO date or epoch).
    pub since: Option<String>,

    /// Optional `until` filter on the post listing.
    pub until: Option<String>,

    /// Maximum comment retrievals in flight at once.
    pub concurrency: usize,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            max_posts: 10,
            max_comments: 500,
            since: None,
            until: None,
            concurrency: 3,
        }
    }
}

impl HarvestOptions {
    pub fn with_max_posts(mut self, max_posts: usize) -> Self {
        self.max_posts = max_posts;
        self
    }

    pub fn with_max_comments(mut self, max_comments: usize) -> Self {
        self.max_comments = max_comments;
        self
    }

    pub fn with_window(mut self, since: Option<String>, until: Option<String>) -> Self {
        self.since = since;
        self.until = until;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Comment cap for a single post: the overall budget divided across
    /// the scanned posts, rounded up, never below 1.
    fn per_post_cap(&self, posts_scanned: usize) -> usize {
        self.max_comments.div_ceil(posts_scanned).max(1)
    }
}

/// Orchestrates a harvest call end to end.
///
/// The executor (and the transport behind it) is shared by every
/// concurrent task in the fan-out; the harvester itself holds no other
/// state, so one instance can serve many calls.
pub struct CommentHarvester {
    executor: Arc<GraphExecutor>,
}

impl CommentHarvester {
    pub fn new(executor: Arc<GraphExecutor>) -> Self {
        Self { executor }
    }

    /// Harvests comments from a page.
    ///
    /// Resolution and post-listing failures abort the whole call; there is
    /// no meaningful partial result without a resolved page or post set.
    /// Comment retrieval failures for an individual post are downgraded to
    /// an empty contribution and a `warn!` event, and never abort sibling
    /// tasks or the call.
    ///
    /// The merged comment list is deterministic: per-post results are
    /// concatenated in post-list order (not completion order), then
    /// deduplicated by comment id keeping the first occurrence.
    pub async fn harvest(
        &self,
        page_reference: &str,
        access_token: &str,
        options: &HarvestOptions,
    ) -> Result<HarvestResult, GraphError> {
        let page_id = resolve_page_id(&self.executor, page_reference, access_token).await?;

        let posts = self.list_posts(&page_id, access_token, options).await?;
        let posts_scanned = posts.len();
        if posts_scanned == 0 {
            info!(page_id = %page_id, "no posts in window, nothing to harvest");
            return Ok(HarvestResult {
                page_id,
                posts_scanned: 0,
                total_fetched: 0,
                comments: Vec::new(),
            });
        }

        let per_post_cap = options.per_post_cap(posts_scanned);
        info!(
            page_id = %page_id,
            posts_scanned,
            per_post_cap,
            concurrency = options.concurrency,
            "fanning out comment retrieval"
        );

        let semaphore = Arc::new(Semaphore::new(options.concurrency));
        let tasks = posts.iter().map(|post| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        warn!(post_id = %post.id, "concurrency gate closed, skipping post");
                        return Vec::new();
                    }
                };
                match self
                    .collect_post_comments(&post.id, access_token, per_post_cap)
                    .await
                {
                    Ok(comments) => comments,
                    Err(e) => {
                        warn!(
                            post_id = %post.id,
                            error = %e,
                            "comment retrieval failed, post contributes nothing"
                        );
                        Vec::new()
                    }
                }
            }
        });

        // join_all yields results in post-list order regardless of which
        // task finished first.
        let per_post_results = join_all(tasks).await;

        let mut seen: HashSet<String> = HashSet::new();
        let mut comments: Vec<Comment> = Vec::new();
        for comment in per_post_results.into_iter().flatten() {
            if seen.insert(comment.comment_id.clone()) {
                comments.push(comment);
            }
        }

        info!(
            page_id = %page_id,
            posts_scanned,
            total_fetched = comments.len(),
            "harvest complete"
        );

        Ok(HarvestResult {
            page_id,
            posts_scanned,
            total_fetched: comments.len(),
            comments,
        })
    }

    /// Lists up to `max_posts` posts from the page feed.
    async fn list_posts(
        &self,
        page_id: &str,
        access_token: &str,
        options: &HarvestOptions,
    ) -> Result<Vec<Post>, GraphError> {
        let mut params = vec![
            ("fields".to_string(), POST_FIELDS.to_string()),
            ("access_token".to_string(), access_token.to_string()),
        ];
        if let Some(since) = &options.since {
            params.push(("since".to_string(), since.clone()));
        }
        if let Some(until) = &options.until {
            params.push(("until".to_string(), until.clone()));
        }

        let raw = paginate(
            &self.executor,
            &format!("{page_id}/posts"),
            params,
            Some(options.max_posts),
        )
        .await?;

        let posts = raw
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Post>(item) {
                Ok(post) => Some(post),
                Err(e) => {
                    // Entries without an id cannot be fetched from anyway.
                    debug!(error = %e, "skipping malformed post entry");
                    None
                }
            })
            .collect();
        Ok(posts)
    }

    /// Fetches, sanitizes, and shapes the comments of one post. Comments
    /// whose text sanitizes to nothing are dropped here.
    async fn collect_post_comments(
        &self,
        post_id: &str,
        access_token: &str,
        cap: usize,
    ) -> Result<Vec<Comment>, GraphError> {
        let params = vec![
            ("fields".to_string(), COMMENT_FIELDS.to_string()),
            ("filter".to_string(), "stream".to_string()),
            ("access_token".to_string(), access_token.to_string()),
        ];

        let raw = paginate(
            &self.executor,
            &format!("{post_id}/comments"),
            params,
            Some(cap),
        )
        .await?;

        let comments = raw
            .into_iter()
            .filter_map(|item| serde_json::from_value::<RawComment>(item).ok())
            .filter_map(|raw| {
                let text = sanitize_comment_text(raw.message.as_deref().unwrap_or(""));
                if text.is_empty() {
                    return None;
                }
                let (author_id, author_name) = raw
                    .from
                    .map(|author| (author.id, author.name))
                    .unwrap_or((None, None));
                Some(Comment {
                    comment_id: raw.id,
                    post_id: post_id.to_string(),
                    text,
                    author_id,
                    author_name,
                    created_time: raw.created_time,
                })
            })
            .collect();
        Ok(comments)
    }
}

// ============================================================================
// Tests
// ============================================================================
