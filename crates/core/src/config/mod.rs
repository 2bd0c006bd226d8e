//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (RESEARCH_TOOLS_*)
//! 2. TOML config file (if RESEARCH_TOOLS_CONFIG_FILE set)
//! 3. Built-in defaults

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::BaseDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::cache::{ResponseCache, TtlPolicy};

mod validation;

pub use validation::ConfigError;

/// Directory under the user's home that holds the cache file.
pub const DATA_DIR_NAME: &str = ".research-tools";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (RESEARCH_TOOLS_*)
/// 2. TOML config file (if RESEARCH_TOOLS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Serper.dev API key, used for Google and YouTube research.
    ///
    /// Set via RESEARCH_TOOLS_SERPER_API_KEY environment variable.
    /// Required only when a Serper-backed request misses the cache.
    #[serde(default)]
    pub serper_api_key: Option<String>,

    /// Optional dev.to API key, sent as the `api-key` header when present.
    #[serde(default)]
    pub devto_api_key: Option<String>,

    /// Path to SQLite cache database.
    ///
    /// Set via RESEARCH_TOOLS_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Per-source retention overrides in hours, merged over the built-in table.
    ///
    /// Set via e.g. RESEARCH_TOOLS_CACHE_TTL_HOURS__REDDIT=6.
    #[serde(default)]
    pub cache_ttl_hours: BTreeMap<String, u64>,
}

/// `~/.research-tools/cache.db`, or a relative path when no home directory exists.
pub fn default_db_path() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
        .join("cache.db")
}

fn default_user_agent() -> String {
    "research-tools/0.1".into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            serper_api_key: None,
            devto_api_key: None,
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            cache_ttl_hours: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("RESEARCH_TOOLS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("RESEARCH_TOOLS_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// TTL table with this configuration's overrides applied.
    pub fn ttl_policy(&self) -> Result<TtlPolicy, ConfigError> {
        TtlPolicy::with_overrides(&self.cache_ttl_hours)
            .map_err(|e| ConfigError::Invalid { field: "cache_ttl_hours".into(), reason: e.to_string() })
    }

    /// Open the response cache at `db_path` with this configuration's TTL table.
    pub async fn open_cache(&self) -> Result<ResponseCache, Error> {
        let policy = self.ttl_policy().map_err(|e| Error::InvalidInput(e.to_string()))?;
        ResponseCache::open(&self.db_path, policy).await
    }

    /// Check if the Serper API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_serper_api_key(&self) -> Result<&str, ConfigError> {
        self.serper_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "serper_api_key".into(),
                hint: "Set RESEARCH_TOOLS_SERPER_API_KEY environment variable".into(),
            })
    }
}
