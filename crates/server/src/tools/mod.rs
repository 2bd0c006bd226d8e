//! MCP tool implementations.
//!
//! This module contains all tools exposed by the research-mcp server. Source
//! tools answer with the research payload plus a `cached` flag; cache tools
//! are thin pass-throughs to the response cache.

use research_core::Fetched;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde::Serialize;

use crate::error::json_result;

pub mod cache;
pub mod devto;
pub mod google;
pub mod reddit;
pub mod youtube;

/// A source payload tagged with whether it came from the cache.
#[derive(Debug, Serialize)]
pub struct SourceOutput<T> {
    pub cached: bool,
    #[serde(flatten)]
    pub result: T,
}

pub fn fetched_result<T: Serialize>(fetched: Fetched<T>) -> Result<CallToolResult, McpError> {
    json_result(&SourceOutput { cached: fetched.cache_hit, result: fetched.value })
}

fn default_country() -> String {
    "us".to_string()
}
