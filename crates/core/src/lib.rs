//! Core types and shared functionality for research-tools.
//!
//! This crate provides:
//! - Response cache with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheRequest, CacheStats, FetchOptions, Fetched, ResponseCache, TtlPolicy};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
