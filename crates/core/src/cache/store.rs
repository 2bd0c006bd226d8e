//! Response store operations.
//!
//! Row-level persistence for cached source responses. Every method is a single
//! `call` on the connection thread, so each write is atomic and readers never
//! see a partially written entry.

use std::collections::BTreeMap;

use super::connection::CacheDb;
use super::fingerprint::CacheRequest;
use crate::Error;
use chrono::{DateTime, Datelike, Duration, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A cached response for one request fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub source: String,
    pub operation: String,
    pub params_json: String,
    /// Opaque serialized response body.
    pub payload: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Build an entry for `request` created at `now` and living for `ttl`.
    ///
    /// Timestamps are truncated to milliseconds, the stored precision. The
    /// expiry must land within four-digit years.
    pub fn new(request: &CacheRequest, payload: String, now: DateTime<Utc>, ttl: Duration) -> Result<Self, Error> {
        let created_at = now.trunc_subsecs(3);
        let expires_at = created_at
            .checked_add_signed(ttl)
            .filter(|at| at.year() <= 9999)
            .ok_or_else(|| Error::InvalidInput(format!("TTL of {}s is out of range", ttl.num_seconds())))?
            .trunc_subsecs(3);
        if expires_at <= created_at {
            return Err(Error::InvalidInput(format!("TTL must be positive, got {}s", ttl.num_seconds())));
        }

        Ok(Self {
            key: request.key(),
            source: request.source().to_string(),
            operation: request.operation().to_string(),
            params_json: request.params_json(),
            payload,
            created_at,
            expires_at,
        })
    }

    /// An entry is fresh strictly before its expiry instant.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Snapshot of cache contents, computed on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CacheStats {
    /// Number of rows, fresh or expired.
    pub total_entries: u64,
    /// Row count per source tag.
    pub by_source: BTreeMap<String, u64>,
    /// Rows past expiry that have not been cleaned up yet.
    pub expired_entries: u64,
    /// Sum of stored payload sizes.
    pub payload_bytes: u64,
    /// Approximate size of the database file.
    pub db_size_bytes: u64,
}

/// Fixed-width RFC 3339 so string order matches time order in SQL.
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::Serialization(format!("bad timestamp '{raw}': {e}")))
}

type RawRow = (String, String, String, String, String, String, String);

impl CacheDb {
    /// Get an entry by key, fresh or not.
    ///
    /// Returns None if the key doesn't exist in the store.
    pub async fn read_entry(&self, key: &str) -> Result<Option<CacheEntry>, Error> {
        let key = key.to_string();
        let row = self
            .conn
            .call(move |conn| -> Result<Option<RawRow>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT key, source, operation, params_json, payload, created_at, expires_at
                     FROM responses WHERE key = ?1",
                )?;

                let result = stmt.query_row(params![key], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?, row.get(6)?))
                });

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        let Some((key, source, operation, params_json, payload, created_at, expires_at)) = row else {
            return Ok(None);
        };

        Ok(Some(CacheEntry {
            key,
            source,
            operation,
            params_json,
            payload,
            created_at: parse_timestamp(&created_at)?,
            expires_at: parse_timestamp(&expires_at)?,
        }))
    }

    /// Insert or update an entry.
    ///
    /// Uses UPSERT semantics: the last writer for a key wins, including its source tag.
    pub async fn write_entry(&self, entry: &CacheEntry) -> Result<(), Error> {
        let entry = entry.clone();
        let created_at = format_timestamp(entry.created_at);
        let expires_at = format_timestamp(entry.expires_at);

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO responses (key, source, operation, params_json, payload, created_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    ON CONFLICT(key) DO UPDATE SET
                        source = excluded.source,
                        operation = excluded.operation,
                        params_json = excluded.params_json,
                        payload = excluded.payload,
                        created_at = excluded.created_at,
                        expires_at = excluded.expires_at",
                    params![
                        &entry.key,
                        &entry.source,
                        &entry.operation,
                        &entry.params_json,
                        &entry.payload,
                        created_at,
                        expires_at
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a single entry.
    ///
    /// Returns true if a row was removed.
    pub async fn delete_entry(&self, key: &str) -> Result<bool, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM responses WHERE key = ?1", params![key])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every entry.
    ///
    /// Returns the number of deleted entries.
    pub async fn delete_all(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM responses", [])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete entries whose expiry is at or before `now`.
    ///
    /// Returns the number of deleted entries.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, Error> {
        let now = format_timestamp(now);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM responses WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Compute store statistics as of `now`.
    pub async fn stats(&self, now: DateTime<Utc>) -> Result<CacheStats, Error> {
        let now = format_timestamp(now);
        self.conn
            .call(move |conn| -> Result<CacheStats, Error> {
                let tx = conn.transaction()?;
                let mut stats = CacheStats::default();

                {
                    let mut stmt = tx.prepare("SELECT source, COUNT(*) FROM responses GROUP BY source")?;
                    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
                    for row in rows {
                        let (source, count) = row?;
                        stats.total_entries += count as u64;
                        stats.by_source.insert(source, count as u64);
                    }
                }

                let expired: i64 = tx.query_row(
                    "SELECT COUNT(*) FROM responses WHERE expires_at <= ?1",
                    params![now],
                    |row| row.get(0),
                )?;
                let payload_bytes: i64 = tx.query_row(
                    "SELECT COALESCE(SUM(LENGTH(CAST(payload AS BLOB))), 0) FROM responses",
                    [],
                    |row| row.get(0),
                )?;
                let db_size: i64 = tx.query_row(
                    "SELECT page_count * page_size FROM pragma_page_count(), pragma_page_size()",
                    [],
                    |row| row.get(0),
                )?;
                tx.commit()?;

                stats.expired_entries = expired as u64;
                stats.payload_bytes = payload_bytes as u64;
                stats.db_size_bytes = db_size as u64;
                Ok(stats)
            })
            .await
            .map_err(Error::from)
    }
}
