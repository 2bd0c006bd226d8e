//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::cache::policy::MAX_TTL_HOURS;
use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `db_path` is empty
    /// - any `cache_ttl_hours` override is zero or above `MAX_TTL_HOURS`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "db_path".into(), reason: "must not be empty".into() });
        }

        for (source, hours) in &self.cache_ttl_hours {
            if *hours == 0 {
                return Err(ConfigError::Invalid {
                    field: format!("cache_ttl_hours.{source}"),
                    reason: "must be at least 1 hour".into(),
                });
            }
            if *hours > MAX_TTL_HOURS {
                return Err(ConfigError::Invalid {
                    field: format!("cache_ttl_hours.{source}"),
                    reason: format!("must not exceed {MAX_TTL_HOURS} hours"),
                });
            }
        }

        if self.serper_api_key.is_none() {
            tracing::debug!("serper_api_key not set; Google and YouTube lookups will only be served from cache");
        }

        Ok(())
    }
}
