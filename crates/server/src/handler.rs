//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use research_client::Research;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::tools::cache::{self, CacheGetParams, CacheInvalidateParams};
use crate::tools::devto::{self, DevtoAuthorsParams, DevtoTagsParams, DevtoTrendingParams};
use crate::tools::google::{self, GoogleKeywordsParams, GoogleQueryParams, GoogleSerpParams};
use crate::tools::reddit::{self, RedditPostsParams};
use crate::tools::youtube::{self, YoutubeChannelParams, YoutubeSearchParams, YoutubeTrendingParams};

/// The main MCP server handler for research-mcp.
#[derive(Clone)]
pub struct ResearchServer {
    research: Research,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl ResearchServer {
    pub fn new(research: Research) -> Self {
        Self { research, tool_router: Self::tool_router() }
    }

    #[tool(description = "Google autocomplete keyword suggestions for a seed query. Cached 48h.")]
    async fn google_keywords(&self, params: Parameters<GoogleKeywordsParams>) -> Result<CallToolResult, McpError> {
        google::keywords_impl(&self.research, params.0).await
    }

    #[tool(description = "Google SERP analysis: organic results, People Also Ask and related searches. Cached 48h.")]
    async fn google_serp(&self, params: Parameters<GoogleSerpParams>) -> Result<CallToolResult, McpError> {
        google::serp_impl(&self.research, params.0).await
    }

    #[tool(description = "Google People Also Ask questions for a query. Cached 48h.")]
    async fn google_paa(&self, params: Parameters<GoogleQueryParams>) -> Result<CallToolResult, McpError> {
        google::paa_impl(&self.research, params.0).await
    }

    #[tool(description = "Google related searches for a query. Cached 48h.")]
    async fn google_related(&self, params: Parameters<GoogleQueryParams>) -> Result<CallToolResult, McpError> {
        google::related_impl(&self.research, params.0).await
    }

    #[tool(description = "Posts from one or more subreddits, ranked by score. Cached 12h.")]
    async fn reddit_posts(&self, params: Parameters<RedditPostsParams>) -> Result<CallToolResult, McpError> {
        reddit::posts_impl(&self.research, params.0).await
    }

    #[tool(description = "Search YouTube videos. Cached 24h.")]
    async fn youtube_search(&self, params: Parameters<YoutubeSearchParams>) -> Result<CallToolResult, McpError> {
        youtube::search_impl(&self.research, params.0).await
    }

    #[tool(description = "Recent videos from a YouTube channel. Cached 24h.")]
    async fn youtube_channel(&self, params: Parameters<YoutubeChannelParams>) -> Result<CallToolResult, McpError> {
        youtube::channel_impl(&self.research, params.0).await
    }

    #[tool(description = "Trending YouTube videos, optionally for a category. Cached 24h.")]
    async fn youtube_trending(&self, params: Parameters<YoutubeTrendingParams>) -> Result<CallToolResult, McpError> {
        youtube::trending_impl(&self.research, params.0).await
    }

    #[tool(description = "Top dev.to articles for the last N days, optionally per tag. Cached 12h.")]
    async fn devto_trending(&self, params: Parameters<DevtoTrendingParams>) -> Result<CallToolResult, McpError> {
        devto::trending_impl(&self.research, params.0).await
    }

    #[tool(description = "dev.to engagement per tag, highest average reactions first. Cached 12h.")]
    async fn devto_tags(&self, params: Parameters<DevtoTagsParams>) -> Result<CallToolResult, McpError> {
        devto::tags_impl(&self.research, params.0).await
    }

    #[tool(description = "Top dev.to authors by total reactions, optionally within tags. Cached 12h.")]
    async fn devto_authors(&self, params: Parameters<DevtoAuthorsParams>) -> Result<CallToolResult, McpError> {
        devto::authors_impl(&self.research, params.0).await
    }

    #[tool(description = "Response cache statistics: entries per source, expired entries and size on disk.")]
    async fn cache_stats(&self) -> Result<CallToolResult, McpError> {
        cache::stats_impl(self.research.cache()?).await
    }

    #[tool(description = "Delete every cached response.")]
    async fn cache_clear(&self) -> Result<CallToolResult, McpError> {
        cache::clear_impl(self.research.cache()?).await
    }

    #[tool(description = "Delete only expired cached responses.")]
    async fn cache_cleanup(&self) -> Result<CallToolResult, McpError> {
        cache::cleanup_impl(self.research.cache()?).await
    }

    #[tool(description = "Fetch one cached response by its fingerprint key, including expired entries.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        cache::get_impl(self.research.cache()?, params.0).await
    }

    #[tool(description = "Remove one cached response by its fingerprint key.")]
    async fn cache_invalidate(&self, params: Parameters<CacheInvalidateParams>) -> Result<CallToolResult, McpError> {
        cache::invalidate_impl(self.research.cache()?, params.0).await
    }
}

impl ServerHandler for ResearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "research-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Research tools for Google, Reddit, YouTube and dev.to. Responses are cached locally per source; \
                 pass no_cache to force a fresh fetch."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
