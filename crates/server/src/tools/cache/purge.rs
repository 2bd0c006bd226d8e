//! cache_clear and cache_cleanup tool implementations.

use research_core::ResponseCache;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::json_result;

/// Output from the cache_clear and cache_cleanup tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Remove every entry regardless of source or expiry.
pub async fn clear_impl(cache: &ResponseCache) -> Result<CallToolResult, McpError> {
    let deleted = cache.clear_all().await?;
    json_result(&CachePurgeOutput { deleted })
}

/// Remove only entries past their expiry.
pub async fn cleanup_impl(cache: &ResponseCache) -> Result<CallToolResult, McpError> {
    let deleted = cache.cleanup().await?;
    json_result(&CachePurgeOutput { deleted })
}
