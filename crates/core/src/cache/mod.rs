//! SQLite-backed response cache for content-source API calls.
//!
//! This module provides a persistent, TTL-aware cache using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Request fingerprints using SHA-256 over normalized parameters
//! - Per-source retention from a static TTL table
//! - Automatic schema migrations
//! - WAL mode so CLI runs and a long-lived server can share the file
//! - Full clear and expired-only cleanup

pub mod clock;
pub mod connection;
pub mod fingerprint;
pub mod migrations;
pub mod policy;
pub mod repository;
pub mod store;

pub use crate::Error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use connection::CacheDb;
pub use fingerprint::{CacheRequest, ParamValue};
pub use policy::TtlPolicy;
pub use repository::{FetchOptions, Fetched, ResponseCache};
pub use store::{CacheEntry, CacheStats};
