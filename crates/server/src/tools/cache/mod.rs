//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and maintaining the response cache.

pub mod get;
pub mod invalidate;
pub mod purge;
pub mod stats;

pub use get::{CacheGetParams, get_impl};
pub use invalidate::{CacheInvalidateParams, invalidate_impl};
pub use purge::{cleanup_impl, clear_impl};
pub use stats::stats_impl;
