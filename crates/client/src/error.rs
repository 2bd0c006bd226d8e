//! Source client error types.

use std::sync::Arc;

use research_core::Error;

/// Errors from the content-source clients.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A source that needs a key was called without one.
    #[error("missing API key: {0}")]
    MissingApiKey(&'static str),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by the upstream API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// Cache configuration error surfaced through the response cache.
    #[error(transparent)]
    Cache(#[from] Error),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { SourceError::Timeout } else { SourceError::Network(Arc::new(err)) }
    }
}

impl SourceError {
    /// Map an HTTP status to the matching error, if it is one.
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Option<Self> {
        if status == 401 || status == 403 {
            return Some(SourceError::AuthError);
        }

        if status == 429 {
            return Some(SourceError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Some(SourceError::HttpError { status: status.as_u16() });
        }

        None
    }
}

impl From<SourceError> for Error {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Cache(e) => e,
            SourceError::MissingApiKey(_) => Error::MissingApiKey(err.to_string()),
            SourceError::InvalidRequest(msg) => Error::InvalidInput(msg),
            SourceError::AuthError => Error::SourceAuth(err.to_string()),
            SourceError::RateLimited => Error::SourceRateLimited(err.to_string()),
            SourceError::HttpError { status } => Error::FetchFailed(format!("HTTP {status}")),
            _ => Error::FetchFailed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SourceError::MissingApiKey("RESEARCH_TOOLS_SERPER_API_KEY not set");
        assert!(err.to_string().contains("API key"));

        let err = SourceError::InvalidRequest("query cannot be empty".to_string());
        assert!(err.to_string().contains("invalid request"));
    }

    #[test]
    fn test_from_status() {
        assert!(matches!(SourceError::from_status(reqwest::StatusCode::UNAUTHORIZED), Some(SourceError::AuthError)));
        assert!(matches!(SourceError::from_status(reqwest::StatusCode::FORBIDDEN), Some(SourceError::AuthError)));
        assert!(matches!(
            SourceError::from_status(reqwest::StatusCode::TOO_MANY_REQUESTS),
            Some(SourceError::RateLimited)
        ));
        assert!(matches!(
            SourceError::from_status(reqwest::StatusCode::BAD_GATEWAY),
            Some(SourceError::HttpError { status: 502 })
        ));
        assert!(SourceError::from_status(reqwest::StatusCode::OK).is_none());
    }

    #[test]
    fn test_into_core_error() {
        let err: Error = SourceError::RateLimited.into();
        assert!(matches!(err, Error::SourceRateLimited(_)));

        let err: Error = SourceError::HttpError { status: 503 }.into();
        assert!(matches!(err, Error::FetchFailed(msg) if msg == "HTTP 503"));

        let err: Error = SourceError::Cache(Error::UnknownSource("x".into())).into();
        assert!(matches!(err, Error::UnknownSource(_)));
    }
}
