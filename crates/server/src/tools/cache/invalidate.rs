//! cache_invalidate tool implementation.

use research_core::cache::fingerprint::is_valid_key;
use research_core::{Error, ResponseCache};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::json_result;

/// Parameters for the cache_invalidate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateParams {
    /// The 64-character fingerprint to remove.
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateOutput {
    /// False when no entry had this key.
    pub removed: bool,
}

pub async fn invalidate_impl(cache: &ResponseCache, params: CacheInvalidateParams) -> Result<CallToolResult, McpError> {
    let key = params.key.trim().to_lowercase();
    if !is_valid_key(&key) {
        return Err(Error::InvalidKey.into());
    }

    let removed = cache.invalidate(&key).await?;
    json_result(&CacheInvalidateOutput { removed })
}
