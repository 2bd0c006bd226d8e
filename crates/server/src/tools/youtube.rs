//! YouTube research tools backed by Serper's video search.

use research_client::Research;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{default_country, fetched_result};
use crate::error::source_error;

/// Parameters for the youtube_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct YoutubeSearchParams {
    pub query: String,

    /// Maximum videos (1-100, default 20).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Two-letter region code (default "us").
    #[serde(default = "default_country")]
    pub region: String,

    #[serde(default)]
    pub no_cache: bool,
}

/// Parameters for the youtube_channel tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct YoutubeChannelParams {
    /// Channel name as shown on YouTube.
    pub channel: String,

    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default = "default_country")]
    pub region: String,

    #[serde(default)]
    pub no_cache: bool,
}

/// Parameters for the youtube_trending tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct YoutubeTrendingParams {
    /// Optional category such as music, gaming or tech.
    #[serde(default)]
    pub category: Option<String>,

    #[serde(default = "default_country")]
    pub region: String,

    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default)]
    pub no_cache: bool,
}

fn default_limit() -> u32 {
    20
}

pub async fn search_impl(research: &Research, params: YoutubeSearchParams) -> Result<CallToolResult, McpError> {
    let fetched = research
        .youtube_search(&params.query, params.limit, &params.region, params.no_cache)
        .await
        .map_err(source_error)?;
    fetched_result(fetched)
}

pub async fn channel_impl(research: &Research, params: YoutubeChannelParams) -> Result<CallToolResult, McpError> {
    let fetched = research
        .youtube_channel(&params.channel, params.limit, &params.region, params.no_cache)
        .await
        .map_err(source_error)?;
    fetched_result(fetched)
}

pub async fn trending_impl(research: &Research, params: YoutubeTrendingParams) -> Result<CallToolResult, McpError> {
    let fetched = research
        .youtube_trending(params.category.as_deref(), &params.region, params.limit, params.no_cache)
        .await
        .map_err(source_error)?;
    fetched_result(fetched)
}
