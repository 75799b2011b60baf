//! Harvest module - comment collection pipeline over the Graph API.
//!
//! This module provides the harvesting stages on top of
//! [`GraphExecutor`](crate::executor::GraphExecutor):
//! - **Resolution**: page reference → canonical page id via [`resolve_page_id`]
//! - **Pagination**: generic cursor-following accumulation via [`paginate::paginate`]
//! - **Sanitization**: comment text cleanup via [`sanitize_comment_text`]
//! - **Orchestration**: bounded-concurrency fan-out via [`pipeline::CommentHarvester`]

pub mod paginate;
pub mod pipeline;
pub mod resolve;
pub mod sanitize;

// Re-export commonly used types
pub use paginate::paginate;
pub use pipeline::{CommentHarvester, HarvestOptions};
pub use resolve::resolve_page_id;
pub use sanitize::sanitize_comment_text;
