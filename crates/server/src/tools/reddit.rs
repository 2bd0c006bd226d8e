//! reddit_posts tool implementation.

use research_client::reddit::{Period, Sort};
use research_client::{RedditQuery, Research};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::fetched_result;
use crate::error::source_error;

/// Parameters for the reddit_posts tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RedditPostsParams {
    /// Subreddit names, with or without the `r/` prefix.
    pub subreddits: Vec<String>,

    /// hot (default), new, rising, top, controversial.
    #[serde(default = "default_sort")]
    pub sort: String,

    /// Time window for top/controversial: hour, day, week (default), month, year, all.
    #[serde(default = "default_period")]
    pub period: String,

    /// Posts per subreddit (1-100, default 25).
    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default)]
    pub no_cache: bool,
}

fn default_sort() -> String {
    "hot".to_string()
}

fn default_period() -> String {
    "week".to_string()
}

fn default_limit() -> u32 {
    25
}

pub async fn posts_impl(research: &Research, params: RedditPostsParams) -> Result<CallToolResult, McpError> {
    let query = RedditQuery {
        subreddits: params.subreddits,
        sort: params.sort.parse::<Sort>().map_err(source_error)?,
        period: params.period.parse::<Period>().map_err(source_error)?,
        limit: params.limit,
    };

    let fetched = research
        .reddit_posts(&query, params.no_cache)
        .await
        .map_err(source_error)?;
    fetched_result(fetched)
}
