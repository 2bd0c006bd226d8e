//! Deterministic cache keys for logical source requests.
//!
//! A request is identified by its source tag, operation name and a set of
//! normalized parameters. Parameters live in a `BTreeMap` so key order never
//! matters, and each value is canonicalized as it is added.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A canonicalized request parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
}

/// A logical request against a content source, prior to hashing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRequest {
    source: String,
    operation: String,
    params: BTreeMap<String, ParamValue>,
}

impl CacheRequest {
    pub fn new(source: impl Into<String>, operation: impl Into<String>) -> Self {
        Self { source: source.into(), operation: operation.into(), params: BTreeMap::new() }
    }

    /// Add a text parameter, kept verbatim apart from surrounding whitespace.
    pub fn text(mut self, name: &str, value: impl AsRef<str>) -> Self {
        self.params
            .insert(name.to_string(), ParamValue::Text(value.as_ref().trim().to_string()));
        self
    }

    /// Add a text parameter the source treats case-insensitively.
    pub fn folded(mut self, name: &str, value: impl AsRef<str>) -> Self {
        self.params
            .insert(name.to_string(), ParamValue::Text(value.as_ref().trim().to_lowercase()));
        self
    }

    /// Add an optional case-insensitive text parameter; `None` is omitted.
    pub fn folded_opt(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.folded(name, v),
            None => self,
        }
    }

    pub fn int(mut self, name: &str, value: i64) -> Self {
        self.params.insert(name.to_string(), ParamValue::Int(value));
        self
    }

    pub fn flag(mut self, name: &str, value: bool) -> Self {
        self.params.insert(name.to_string(), ParamValue::Bool(value));
        self
    }

    /// Add a list whose order is significant to the source.
    pub fn list<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values = values.into_iter().map(|v| v.as_ref().trim().to_string()).collect();
        self.params.insert(name.to_string(), ParamValue::List(values));
        self
    }

    /// Add an order-insensitive, case-insensitive list (e.g. tags, subreddits).
    ///
    /// Values are trimmed, lowercased, deduplicated and sorted; blanks are dropped.
    pub fn set<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .collect();
        self.params
            .insert(name.to_string(), ParamValue::List(values.into_iter().collect()));
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn params(&self) -> &BTreeMap<String, ParamValue> {
        &self.params
    }

    /// Canonical JSON of the parameter map, stored next to each entry.
    pub fn params_json(&self) -> String {
        serde_json::to_string(&self.params).unwrap_or_default()
    }

    /// The fingerprint for this request.
    pub fn key(&self) -> String {
        build(&self.source, &self.operation, &self.params)
    }
}

/// Compute the cache key for `source|operation|params`.
///
/// SHA-256 over the source, the operation and the canonical JSON encoding of
/// the (already sorted) parameter map, hex encoded.
pub fn build(source: &str, operation: &str, params: &BTreeMap<String, ParamValue>) -> String {
    let canonical = serde_json::to_string(params).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(b"\n");
    hasher.update(operation.as_bytes());
    hasher.update(b"\n");
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check that a string has the shape of a fingerprint (64 lowercase hex chars).
pub fn is_valid_key(key: &str) -> bool {
    key.len() == 64 && key.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}
