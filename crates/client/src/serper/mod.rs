//! Serper.dev Google API client.
//!
//! Serper proxies Google Search, Autocomplete and Videos. It backs both the
//! Google keyword/SERP research and the YouTube research.
//!
//! - **Endpoint**: `https://google.serper.dev/{search,autocomplete,videos}`
//! - **Authentication**: `X-API-KEY` header.
//! - **Method**: `POST` with a JSON body.

pub mod request;
pub mod response;

pub use request::{AutocompleteRequest, SearchRequest};
pub use response::{OrganicResult, PeopleAlsoAsk, SearchResponse, VideoResult};

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::SourceError;
use crate::http;

/// Default base URL for Serper.dev.
const DEFAULT_BASE_URL: &str = "https://google.serper.dev";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "research-tools/0.1";

/// Serper client configuration.
#[derive(Debug, Clone)]
pub struct SerperConfig {
    pub api_key: String,
    /// Base URL (default: https://google.serper.dev).
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for SerperConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Operations the research layer needs from Serper.
#[async_trait::async_trait]
pub trait SerperApi: Send + Sync {
    /// Google web search: organic results, People Also Ask, related searches.
    async fn search(&self, req: &SearchRequest) -> Result<SearchResponse, SourceError>;

    /// Google autocomplete suggestions.
    async fn autocomplete(&self, req: &AutocompleteRequest) -> Result<Vec<String>, SourceError>;

    /// Google Videos results (mostly YouTube).
    async fn videos(&self, req: &SearchRequest) -> Result<Vec<VideoResult>, SourceError>;
}

/// Serper.dev HTTP client.
#[derive(Debug, Clone)]
pub struct SerperClient {
    http: reqwest::Client,
    config: SerperConfig,
}

impl SerperClient {
    /// Create a new client; the API key must be non-empty.
    pub fn new(config: SerperConfig) -> Result<Self, SourceError> {
        if config.api_key.is_empty() {
            return Err(SourceError::MissingApiKey("RESEARCH_TOOLS_SERPER_API_KEY not set"));
        }

        let http = http::build_client(config.timeout, &config.user_agent)?;
        Ok(Self { http, config })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, SourceError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}/{path}", self.config.base_url);
        tracing::debug!(%url, "calling Serper API");

        let request = self.http.post(&url).header("X-API-KEY", &self.config.api_key).json(body);
        http::send_json("serper", request).await
    }
}

#[async_trait::async_trait]
impl SerperApi for SerperClient {
    async fn search(&self, req: &SearchRequest) -> Result<SearchResponse, SourceError> {
        req.validate()?;
        let raw: response::SerperSearchResponse = self.post("search", req).await?;
        let response = SearchResponse::from_raw(&req.q, raw);
        tracing::debug!(query = %req.q, results = response.organic.len(), "search completed");
        Ok(response)
    }

    async fn autocomplete(&self, req: &AutocompleteRequest) -> Result<Vec<String>, SourceError> {
        req.validate()?;
        let raw: response::SerperAutocompleteResponse = self.post("autocomplete", req).await?;
        Ok(raw.into())
    }

    async fn videos(&self, req: &SearchRequest) -> Result<Vec<VideoResult>, SourceError> {
        req.validate()?;
        let raw: response::SerperVideosResponse = self.post("videos", req).await?;
        Ok(raw.into())
    }
}
