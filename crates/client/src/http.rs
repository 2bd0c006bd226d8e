//! Shared HTTP plumbing for the source clients.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::de::DeserializeOwned;

use crate::SourceError;

/// Build a `reqwest::Client` with the configured timeout and user agent.
pub(crate) fn build_client(timeout: Duration, user_agent: &str) -> Result<reqwest::Client, SourceError> {
    let http = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(http)
}

/// Send `request`, map error statuses, and decode the JSON body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    source: &'static str, request: reqwest::RequestBuilder,
) -> Result<T, SourceError> {
    let start = Instant::now();
    let response = request.header(header::ACCEPT, "application/json").send().await?;

    let status = response.status();
    tracing::debug!(source, %status, elapsed = ?start.elapsed(), "upstream response");

    if let Some(err) = SourceError::from_status(status) {
        return Err(err);
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| SourceError::Parse(format!("{source}: {e}")))
}
