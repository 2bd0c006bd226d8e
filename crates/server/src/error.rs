//! Tool result and error helpers for the research-mcp server.
//!
//! Error codes come from `research_core::Error`; source failures are mapped
//! onto it first so every tool reports the same codes.

use research_client::SourceError;
use research_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Map a source client failure to its MCP error.
pub fn source_error(err: SourceError) -> McpError {
    Error::from(err).into()
}

/// Pretty-print `value` as the tool's single text content.
pub fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Serialization(format!("failed to serialize tool output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn test_source_error_codes() {
        assert_eq!(source_error(SourceError::InvalidRequest("empty".into())).code, ErrorCode(-32602));
        assert_eq!(source_error(SourceError::RateLimited).code, ErrorCode(-32008));
        assert_eq!(source_error(SourceError::MissingApiKey("no key")).code, ErrorCode(-32009));
        assert_eq!(source_error(SourceError::HttpError { status: 500 }).code, ErrorCode(-32006));
    }

    #[test]
    fn test_json_result() {
        let result = json_result(&serde_json::json!({"cached": true})).unwrap();
        let content = serde_json::to_value(&result.content[0]).unwrap();
        let text = content.get("text").and_then(|v| v.as_str()).unwrap();
        assert!(text.contains("\"cached\": true"));
    }
}
