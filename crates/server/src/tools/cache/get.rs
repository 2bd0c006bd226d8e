//! cache_get tool implementation.
//!
//! Retrieves a cached response by fingerprint, including expired rows that
//! have not been cleaned up yet.

use chrono::{DateTime, Utc};
use research_core::cache::fingerprint::is_valid_key;
use research_core::{Error, ResponseCache};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::json_result;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// The 64-character fingerprint of the cached response.
    pub key: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheGetOutput {
    pub key: String,
    pub source: String,
    pub operation: String,
    /// Canonical request parameters the key was built from.
    pub params: serde_json::Value,
    /// The cached response body.
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// True when the entry is past expiry and would be refetched.
    pub expired: bool,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(cache: &ResponseCache, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let key = params.key.trim().to_lowercase();
    if !is_valid_key(&key) {
        return Err(Error::InvalidKey.into());
    }

    let entry = cache
        .entry(&key)
        .await?
        .ok_or_else(|| Error::CacheMiss(key.clone()))?;

    let output = CacheGetOutput {
        expired: !entry.is_fresh(Utc::now()),
        params: serde_json::from_str(&entry.params_json).map_err(Error::from)?,
        payload: serde_json::from_str(&entry.payload).unwrap_or_else(|_| serde_json::Value::String(entry.payload.clone())),
        key: entry.key,
        source: entry.source,
        operation: entry.operation,
        created_at: entry.created_at,
        expires_at: entry.expires_at,
    };
    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::output;
    use research_core::TtlPolicy;
    use research_core::cache::{CacheDb, CacheRequest};
    use rmcp::model::ErrorCode;

    async fn cache() -> ResponseCache {
        ResponseCache::new(CacheDb::open_in_memory().await.unwrap(), TtlPolicy::default())
    }

    #[tokio::test]
    async fn test_get_impl_missing() {
        let cache = cache().await;
        let params = CacheGetParams { key: "a".repeat(64) };

        let err = get_impl(&cache, params).await.unwrap_err();
        assert_eq!(err.code, ErrorCode(-32001));
    }

    #[tokio::test]
    async fn test_get_impl_malformed_key() {
        let cache = cache().await;
        let params = CacheGetParams { key: "nonexistent".to_string() };

        let err = get_impl(&cache, params).await.unwrap_err();
        assert_eq!(err.code, ErrorCode(-32002));
    }

    #[tokio::test]
    async fn test_get_impl_found() {
        let cache = cache().await;
        let request = CacheRequest::new("serper", "keywords").text("query", "rust");
        let entry = cache
            .put(&request, r#"{"suggestions":["rust book"]}"#.into(), chrono::Duration::hours(48))
            .await
            .unwrap();

        let out = output(&get_impl(&cache, CacheGetParams { key: entry.key.to_uppercase() }).await.unwrap());
        assert_eq!(out["source"], "serper");
        assert_eq!(out["operation"], "keywords");
        assert_eq!(out["params"]["query"], "rust");
        assert_eq!(out["payload"]["suggestions"][0], "rust book");
        assert_eq!(out["expired"], false);
    }
}
