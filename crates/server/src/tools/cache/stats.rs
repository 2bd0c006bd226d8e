//! cache_stats tool implementation.

use research_core::ResponseCache;
use rmcp::{ErrorData as McpError, model::CallToolResult};

use crate::error::json_result;

/// Entry counts per source, expired rows and on-disk size.
pub async fn stats_impl(cache: &ResponseCache) -> Result<CallToolResult, McpError> {
    let stats = cache.statistics().await?;
    json_result(&stats)
}
