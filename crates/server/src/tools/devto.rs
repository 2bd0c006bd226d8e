//! dev.to tool implementations: trending articles plus tag and author engagement.

use research_client::{DevToQuery, DevToStatsQuery, Research};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::fetched_result;
use crate::error::source_error;

/// Parameters for the devto_trending tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DevtoTrendingParams {
    /// Tags to fetch; empty means the general feed.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Look-back window in days (default 7).
    #[serde(default = "default_period")]
    pub period: u32,

    /// Maximum articles (default 100).
    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default)]
    pub no_cache: bool,
}

/// Parameters for the devto_tags tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DevtoTagsParams {
    /// Tags to compare (at least one).
    pub tags: Vec<String>,

    /// Look-back window in days (default 7).
    #[serde(default = "default_period")]
    pub period: u32,

    /// Maximum tags returned (default 10).
    #[serde(default = "default_stats_limit")]
    pub limit: u32,

    #[serde(default)]
    pub no_cache: bool,
}

/// Parameters for the devto_authors tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DevtoAuthorsParams {
    /// Only count articles under these tags; empty means the general feed.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Look-back window in days (default 7).
    #[serde(default = "default_period")]
    pub period: u32,

    /// Maximum authors returned (default 10).
    #[serde(default = "default_stats_limit")]
    pub limit: u32,

    #[serde(default)]
    pub no_cache: bool,
}

fn default_period() -> u32 {
    7
}

fn default_limit() -> u32 {
    100
}

fn default_stats_limit() -> u32 {
    10
}

pub async fn trending_impl(research: &Research, params: DevtoTrendingParams) -> Result<CallToolResult, McpError> {
    let query = DevToQuery { tags: params.tags, period_days: params.period, limit: params.limit };
    let fetched = research
        .devto_trending(&query, params.no_cache)
        .await
        .map_err(source_error)?;
    fetched_result(fetched)
}

pub async fn tags_impl(research: &Research, params: DevtoTagsParams) -> Result<CallToolResult, McpError> {
    let query = DevToStatsQuery { tags: params.tags, period_days: params.period, limit: params.limit };
    let fetched = research
        .devto_tags(&query, params.no_cache)
        .await
        .map_err(source_error)?;
    fetched_result(fetched)
}

pub async fn authors_impl(research: &Research, params: DevtoAuthorsParams) -> Result<CallToolResult, McpError> {
    let query = DevToStatsQuery { tags: params.tags, period_days: params.period, limit: params.limit };
    let fetched = research
        .devto_authors(&query, params.no_cache)
        .await
        .map_err(source_error)?;
    fetched_result(fetched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{output, research};

    #[tokio::test]
    async fn test_trending_defaults_and_cache() {
        let (research, upstream) = research().await;
        let params: DevtoTrendingParams = serde_json::from_str(r#"{"tags": ["Rust", "webdev"]}"#).unwrap();
        assert_eq!(params.period, 7);

        let first = output(&trending_impl(&research, params.clone()).await.unwrap());
        assert_eq!(first["cached"], false);
        assert_eq!(first["tags"], serde_json::json!(["rust", "webdev"]));
        assert_eq!(upstream.calls(), 2);

        let second = output(&trending_impl(&research, params).await.unwrap());
        assert_eq!(second["cached"], true);
        assert_eq!(upstream.calls(), 2);
    }

    #[tokio::test]
    async fn test_zero_period_rejected() {
        let (research, _) = research().await;
        let params: DevtoTrendingParams = serde_json::from_str(r#"{"period": 0}"#).unwrap();
        assert!(trending_impl(&research, params).await.is_err());
    }

    #[tokio::test]
    async fn test_tags_reports_each_tag() {
        let (research, upstream) = research().await;
        let params: DevtoTagsParams = serde_json::from_str(r#"{"tags": ["webdev", "Rust"]}"#).unwrap();
        assert_eq!(params.limit, 10);

        let first = output(&tags_impl(&research, params.clone()).await.unwrap());
        assert_eq!(first["cached"], false);
        assert_eq!(first["sample_size"], 2);
        assert_eq!(first["tags"].as_array().unwrap().len(), 2);
        assert_eq!(first["tags"][0]["avg_reactions"], 12.0);

        let second = output(&tags_impl(&research, params).await.unwrap());
        assert_eq!(second["cached"], true);
        assert_eq!(upstream.calls(), 2);
    }

    #[tokio::test]
    async fn test_tags_missing_is_invalid_params() {
        let (research, _) = research().await;
        let params: DevtoTagsParams = serde_json::from_str(r#"{"tags": []}"#).unwrap();
        let err = tags_impl(&research, params).await.unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode(-32602));
    }

    #[tokio::test]
    async fn test_authors_general_feed() {
        let (research, upstream) = research().await;
        let params: DevtoAuthorsParams = serde_json::from_str("{}").unwrap();

        let result = output(&authors_impl(&research, params).await.unwrap());
        assert_eq!(result["tags"], serde_json::json!([]));
        assert_eq!(result["authors"][0]["username"], "writer");
        assert_eq!(result["authors"][0]["total_reactions"], 12);
        assert_eq!(upstream.calls(), 1);
    }
}
