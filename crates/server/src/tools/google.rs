//! Google research tools backed by Serper.
//!
//! google_keywords, google_serp, google_paa and google_related share the
//! serper TTL (48 hours by default).

use research_client::Research;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{default_country, fetched_result};
use crate::error::source_error;

/// Parameters for the google_keywords tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GoogleKeywordsParams {
    /// Seed keyword to expand with autocomplete suggestions.
    pub query: String,

    /// Skip the cache lookup and fetch fresh (the result is still cached).
    #[serde(default)]
    pub no_cache: bool,
}

/// Parameters for the google_serp tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GoogleSerpParams {
    /// Search query.
    pub query: String,

    /// Number of organic results (1-100, default 10).
    #[serde(default = "default_num")]
    pub num: u32,

    /// Two-letter country code (default "us").
    #[serde(default = "default_country")]
    pub country: String,

    #[serde(default)]
    pub no_cache: bool,
}

/// Parameters for the google_paa and google_related tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GoogleQueryParams {
    pub query: String,

    /// Two-letter country code (default "us").
    #[serde(default = "default_country")]
    pub country: String,

    #[serde(default)]
    pub no_cache: bool,
}

fn default_num() -> u32 {
    10
}

pub async fn keywords_impl(research: &Research, params: GoogleKeywordsParams) -> Result<CallToolResult, McpError> {
    let fetched = research
        .keywords(&params.query, params.no_cache)
        .await
        .map_err(source_error)?;
    fetched_result(fetched)
}

pub async fn serp_impl(research: &Research, params: GoogleSerpParams) -> Result<CallToolResult, McpError> {
    let fetched = research
        .serp(&params.query, params.num, &params.country, params.no_cache)
        .await
        .map_err(source_error)?;
    fetched_result(fetched)
}

pub async fn paa_impl(research: &Research, params: GoogleQueryParams) -> Result<CallToolResult, McpError> {
    let fetched = research
        .people_also_ask(&params.query, &params.country, params.no_cache)
        .await
        .map_err(source_error)?;
    fetched_result(fetched)
}

pub async fn related_impl(research: &Research, params: GoogleQueryParams) -> Result<CallToolResult, McpError> {
    let fetched = research
        .related(&params.query, &params.country, params.no_cache)
        .await
        .map_err(source_error)?;
    fetched_result(fetched)
}
