//! The response cache consumed by every source adapter.
//!
//! [`ResponseCache`] ties the fingerprint, the store and the TTL policy
//! together. It never talks to the network itself: callers hand it a fetch
//! future, which runs outside of any store call so unrelated fetches are not
//! serialized behind each other.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::clock::{Clock, SystemClock};
use super::connection::CacheDb;
use super::fingerprint::CacheRequest;
use super::policy::TtlPolicy;
use super::store::{CacheEntry, CacheStats};
use crate::Error;

/// Per-call cache behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Skip the lookup and always fetch; the fresh result is still stored.
    pub bypass: bool,
    /// Retention for this entry instead of the source's policy TTL.
    pub ttl: Option<Duration>,
}

impl FetchOptions {
    pub fn no_cache(bypass: bool) -> Self {
        Self { bypass, ttl: None }
    }
}

/// A value returned from [`ResponseCache::get_or_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<T> {
    pub value: T,
    /// True when served from the store without calling fetch.
    pub cache_hit: bool,
}

impl<T> Fetched<T> {
    pub fn hit(value: T) -> Self {
        Self { value, cache_hit: true }
    }

    pub fn miss(value: T) -> Self {
        Self { value, cache_hit: false }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched { value: f(self.value), cache_hit: self.cache_hit }
    }
}

/// TTL-aware response cache over a [`CacheDb`].
#[derive(Debug, Clone)]
pub struct ResponseCache {
    db: CacheDb,
    policy: TtlPolicy,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(db: CacheDb, policy: TtlPolicy) -> Self {
        Self { db, policy, clock: Arc::new(SystemClock) }
    }

    /// Open (creating if needed) the store at `path`.
    pub async fn open(path: impl AsRef<Path>, policy: TtlPolicy) -> Result<Self, Error> {
        Ok(Self::new(CacheDb::open(path).await?, policy))
    }

    /// Replace the time source; used to exercise expiry deterministically.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(&self) -> &TtlPolicy {
        &self.policy
    }

    /// Return the cached value for `request`, or run `fetch` and store its result.
    ///
    /// Store failures never block a fetch: a failed lookup is logged and
    /// treated as a miss, and a failed write is logged while the fresh value
    /// is still returned. Fetch errors are returned as-is and nothing is
    /// cached for them. An unknown source fails before any lookup or fetch.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self, request: &CacheRequest, options: FetchOptions, fetch: F,
    ) -> Result<Fetched<T>, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<Error>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let ttl = match options.ttl {
            Some(ttl) => ttl,
            None => self.policy.ttl_for(request.source())?,
        };
        let key = request.key();

        if !options.bypass {
            match self.lookup::<T>(&key).await {
                Ok(Some(value)) => {
                    tracing::debug!(source = request.source(), operation = request.operation(), %key, "cache hit");
                    return Ok(Fetched::hit(value));
                }
                Ok(None) => {
                    tracing::debug!(source = request.source(), operation = request.operation(), %key, "cache miss");
                }
                Err(e) => {
                    tracing::warn!(%key, error = %e, "cache lookup failed, fetching fresh");
                }
            }
        }

        let value = fetch().await?;

        if let Err(e) = self.store(request, &value, ttl).await {
            tracing::warn!(%key, error = %e, "failed to cache fresh result");
        }

        Ok(Fetched::miss(value))
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        let Some(entry) = self.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&entry.payload) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(%key, error = %e, "cached payload no longer decodes, treating as miss");
                Ok(None)
            }
        }
    }

    async fn store<T: Serialize>(&self, request: &CacheRequest, value: &T, ttl: Duration) -> Result<(), Error> {
        let payload = serde_json::to_string(value)?;
        self.put(request, payload, ttl).await.map(|_| ())
    }

    /// The fresh entry for `key`, if any. Expired rows read as absent.
    pub async fn get(&self, key: &str) -> Result<Option<CacheEntry>, Error> {
        let now = self.clock.now();
        Ok(self.db.read_entry(key).await?.filter(|entry| entry.is_fresh(now)))
    }

    /// The stored row for `key` regardless of expiry.
    pub async fn entry(&self, key: &str) -> Result<Option<CacheEntry>, Error> {
        self.db.read_entry(key).await
    }

    /// Store a raw payload for `request`, created now and living for `ttl`.
    pub async fn put(&self, request: &CacheRequest, payload: String, ttl: Duration) -> Result<CacheEntry, Error> {
        let entry = CacheEntry::new(request, payload, self.clock.now(), ttl)?;
        self.db.write_entry(&entry).await?;
        Ok(entry)
    }

    /// Remove a single entry. Returns true if it existed.
    pub async fn invalidate(&self, key: &str) -> Result<bool, Error> {
        self.db.delete_entry(key).await
    }

    /// Remove every entry regardless of source or expiry.
    pub async fn clear_all(&self) -> Result<u64, Error> {
        let deleted = self.db.delete_all().await?;
        tracing::info!(deleted, "cleared response cache");
        Ok(deleted)
    }

    /// Remove only entries at or past their expiry.
    pub async fn cleanup(&self) -> Result<u64, Error> {
        let deleted = self.db.delete_expired(self.clock.now()).await?;
        tracing::info!(deleted, "removed expired cache entries");
        Ok(deleted)
    }

    /// Current statistics; every source in the policy table is listed, even at zero.
    pub async fn statistics(&self) -> Result<CacheStats, Error> {
        let mut stats = self.db.stats(self.clock.now()).await?;
        for source in self.policy.sources() {
            stats.by_source.entry(source.to_string()).or_insert(0);
        }
        Ok(stats)
    }
}
