//! Serper.dev request bodies and validation.

use serde::Serialize;

use crate::SourceError;

/// Longest query Google accepts, in bytes.
const MAX_QUERY_LEN: usize = 2048;

/// Body for `POST /search` and `POST /videos`.
///
/// Based on the Serper.dev Google Search API: https://serper.dev/playground
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchRequest {
    /// Search query (required).
    pub q: String,

    /// Number of results (1-100, default 10).
    pub num: u32,

    /// Country code (e.g. "us", "gb", "rs").
    pub gl: String,

    /// Interface language (e.g. "en").
    pub hl: String,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self { q: String::new(), num: 10, gl: "us".to_string(), hl: "en".to_string() }
    }
}

impl SearchRequest {
    pub fn new(q: impl Into<String>, num: u32, gl: impl Into<String>) -> Self {
        Self { q: q.into(), num, gl: gl.into().to_lowercase(), ..Default::default() }
    }

    /// Validate the request parameters.
    ///
    /// Returns an error if any parameters are out of range or malformed.
    pub fn validate(&self) -> Result<(), SourceError> {
        validate_query(&self.q)?;

        if !(1..=100).contains(&self.num) {
            return Err(SourceError::InvalidRequest(format!("num must be 1-100, got {}", self.num)));
        }

        validate_country(&self.gl)?;

        Ok(())
    }
}

/// Body for `POST /autocomplete`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AutocompleteRequest {
    pub q: String,
}

impl AutocompleteRequest {
    pub fn validate(&self) -> Result<(), SourceError> {
        validate_query(&self.q)
    }
}

pub(crate) fn validate_query(q: &str) -> Result<(), SourceError> {
    if q.trim().is_empty() {
        return Err(SourceError::InvalidRequest("query cannot be empty".to_string()));
    }

    if q.len() > MAX_QUERY_LEN {
        return Err(SourceError::InvalidRequest(format!(
            "query too long: {} chars (max {MAX_QUERY_LEN})",
            q.len()
        )));
    }

    Ok(())
}

/// Country codes are two ASCII letters.
pub(crate) fn validate_country(gl: &str) -> Result<(), SourceError> {
    if gl.len() != 2 || !gl.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(SourceError::InvalidRequest(format!("invalid country code: {gl}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let req = SearchRequest::new("rust async runtime", 10, "US");
        assert_eq!(req.gl, "us");
        assert_eq!(req.hl, "en");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_query() {
        let req = SearchRequest::new("   ", 10, "us");
        assert!(matches!(req.validate(), Err(SourceError::InvalidRequest(_))));
    }

    #[test]
    fn test_query_too_long() {
        let req = SearchRequest::new("a".repeat(MAX_QUERY_LEN + 1), 10, "us");
        assert!(matches!(req.validate(), Err(SourceError::InvalidRequest(_))));
    }

    #[test]
    fn test_num_range() {
        assert!(SearchRequest::new("q", 0, "us").validate().is_err());
        assert!(SearchRequest::new("q", 101, "us").validate().is_err());
        assert!(SearchRequest::new("q", 1, "us").validate().is_ok());
        assert!(SearchRequest::new("q", 100, "us").validate().is_ok());
    }

    #[test]
    fn test_invalid_country() {
        assert!(SearchRequest::new("q", 10, "usa").validate().is_err());
        assert!(SearchRequest::new("q", 10, "u1").validate().is_err());
    }

    #[test]
    fn test_serialization() {
        let req = SearchRequest::new("rust", 20, "gb");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"q": "rust", "num": 20, "gl": "gb", "hl": "en"}));
    }

    #[test]
    fn test_autocomplete_validation() {
        assert!(AutocompleteRequest { q: "rust".into() }.validate().is_ok());
        assert!(AutocompleteRequest { q: String::new() }.validate().is_err());
    }
}
