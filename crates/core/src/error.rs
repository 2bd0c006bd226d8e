//! Unified error types for research-tools.
//!
//! Display strings carry a stable code prefix so front ends can match on them.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the research-tools crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No cache entry found for the given key.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// The persistent store could not be opened or created.
    #[error("STORE_UNAVAILABLE: {0}")]
    StoreUnavailable(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Invalid fingerprint format.
    #[error("CACHE_ERROR: invalid cache key")]
    InvalidKey,

    /// A source tag with no entry in the TTL policy table.
    #[error("UNKNOWN_SOURCE: {0}")]
    UnknownSource(String),

    /// Payload could not be serialized for storage or read back.
    #[error("SERIALIZATION_FAILED: {0}")]
    Serialization(String),

    /// The upstream content API call failed.
    #[error("FETCH_FAILED: {0}")]
    FetchFailed(String),

    /// Upstream rejected the API key.
    #[error("SOURCE_AUTH_ERROR: {0}")]
    SourceAuth(String),

    /// Upstream rate limited the request.
    #[error("SOURCE_RATE_LIMITED: {0}")]
    SourceRateLimited(String),

    /// A source that needs an API key was called without one.
    #[error("MISSING_API_KEY: {0}")]
    MissingApiKey(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::CacheMiss(msg) => (-32001, msg.clone()),
            Error::StoreUnavailable(msg) => (-32003, msg.clone()),
            Error::UnknownSource(msg) => (-32004, format!("no TTL policy for source '{msg}'")),
            Error::Serialization(msg) => (-32005, msg.clone()),
            Error::FetchFailed(msg) => (-32006, msg.clone()),
            Error::SourceAuth(msg) => (-32007, msg.clone()),
            Error::SourceRateLimited(msg) => (-32008, msg.clone()),
            Error::MissingApiKey(msg) => (-32009, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::InvalidKey => (-32002, "Invalid cache key".to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownSource("hackernews".to_string());
        assert!(err.to_string().contains("UNKNOWN_SOURCE"));
        assert!(err.to_string().contains("hackernews"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::CacheMiss("abc123".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32001);

        let err = Error::InvalidInput("query cannot be empty".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_serde_error_is_serialization() {
        let err: Error = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
