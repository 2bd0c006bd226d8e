//! Per-source retention policy.

use std::collections::BTreeMap;

use chrono::Duration;

use crate::Error;

/// dev.to trending articles.
pub const DEVTO: &str = "devto";
/// Serper.dev search, keyword, PAA and related-search responses.
pub const SERPER: &str = "serper";
/// Subreddit listings.
pub const REDDIT: &str = "reddit";
/// YouTube video listings (served via Serper's video endpoint).
pub const YOUTUBE: &str = "youtube";

/// Longest retention a source may be configured with (ten years).
pub const MAX_TTL_HOURS: u64 = 10 * 365 * 24;

/// Built-in retention per source tag.
const DEFAULT_TTL_HOURS: &[(&str, i64)] = &[(SERPER, 48), (REDDIT, 12), (YOUTUBE, 24), (DEVTO, 12)];

/// Immutable mapping from source tag to retention duration.
///
/// Lookups for a tag with no entry fail with [`Error::UnknownSource`]; there is
/// no fallback TTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlPolicy {
    ttls: BTreeMap<String, Duration>,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            ttls: DEFAULT_TTL_HOURS
                .iter()
                .map(|(source, hours)| (source.to_string(), Duration::hours(*hours)))
                .collect(),
        }
    }
}

impl TtlPolicy {
    /// Built-in table with per-source hour overrides layered on top.
    ///
    /// Overrides may also introduce new source tags. Each override must lie in
    /// `1..=MAX_TTL_HOURS`.
    pub fn with_overrides(overrides: &BTreeMap<String, u64>) -> Result<Self, Error> {
        let mut policy = Self::default();
        for (source, hours) in overrides {
            if *hours == 0 {
                return Err(Error::InvalidInput(format!("TTL for source '{source}' must be at least one hour")));
            }
            let ttl = i64::try_from(*hours)
                .ok()
                .filter(|_| *hours <= MAX_TTL_HOURS)
                .and_then(Duration::try_hours)
                .ok_or_else(|| {
                    Error::InvalidInput(format!("TTL for source '{source}' must not exceed {MAX_TTL_HOURS} hours"))
                })?;
            policy.ttls.insert(source.to_lowercase(), ttl);
        }
        Ok(policy)
    }

    /// Retention for `source`.
    pub fn ttl_for(&self, source: &str) -> Result<Duration, Error> {
        self.ttls
            .get(source)
            .copied()
            .ok_or_else(|| Error::UnknownSource(source.to_string()))
    }

    /// All known source tags, sorted.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.ttls.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttls() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.ttl_for(SERPER).unwrap(), Duration::hours(48));
        assert_eq!(policy.ttl_for(REDDIT).unwrap(), Duration::hours(12));
        assert_eq!(policy.ttl_for(YOUTUBE).unwrap(), Duration::hours(24));
        assert_eq!(policy.ttl_for(DEVTO).unwrap(), Duration::hours(12));
    }

    #[test]
    fn test_unknown_source_fails() {
        let policy = TtlPolicy::default();
        let result = policy.ttl_for("hackernews");
        assert!(matches!(result, Err(Error::UnknownSource(s)) if s == "hackernews"));
    }

    #[test]
    fn test_overrides() {
        let overrides = BTreeMap::from([("reddit".to_string(), 6), ("HackerNews".to_string(), 2)]);
        let policy = TtlPolicy::with_overrides(&overrides).unwrap();
        assert_eq!(policy.ttl_for(REDDIT).unwrap(), Duration::hours(6));
        assert_eq!(policy.ttl_for("hackernews").unwrap(), Duration::hours(2));
        assert_eq!(policy.ttl_for(SERPER).unwrap(), Duration::hours(48));
    }

    #[test]
    fn test_zero_override_rejected() {
        let overrides = BTreeMap::from([("reddit".to_string(), 0)]);
        assert!(matches!(TtlPolicy::with_overrides(&overrides), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_oversized_override_rejected() {
        for hours in [MAX_TTL_HOURS + 1, 10_000_000_000, u64::MAX] {
            let overrides = BTreeMap::from([("reddit".to_string(), hours)]);
            assert!(matches!(TtlPolicy::with_overrides(&overrides), Err(Error::InvalidInput(_))), "{hours}");
        }

        let overrides = BTreeMap::from([("reddit".to_string(), MAX_TTL_HOURS)]);
        let policy = TtlPolicy::with_overrides(&overrides).unwrap();
        assert_eq!(policy.ttl_for(REDDIT).unwrap(), Duration::hours(MAX_TTL_HOURS as i64));
    }

    #[test]
    fn test_sources_sorted() {
        let policy = TtlPolicy::default();
        let sources: Vec<&str> = policy.sources().collect();
        assert_eq!(sources, vec!["devto", "reddit", "serper", "youtube"]);
    }
}
