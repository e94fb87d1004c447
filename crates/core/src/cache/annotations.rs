//! Annotation cache operations on the SQLite backend.
//!
//! Timestamps are stored as RFC 3339 UTC strings with fixed millisecond
//! precision so that string comparison orders them chronologically.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;

use super::CacheStore;
use super::connection::CacheDb;
use crate::Error;

/// Row counts for the annotation cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub total: u64,
    pub expired: u64,
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Latest expiry that still formats as a four-digit year (9999-12-31T23:59:59Z).
fn far_future() -> DateTime<Utc> {
    DateTime::from_timestamp(253_402_300_799, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .map_or_else(far_future, |at| at.min(far_future()))
}

impl CacheDb {
    /// Get a cached annotation by key.
    ///
    /// Returns None if the key doesn't exist or has expired.
    pub async fn get_annotation(&self, key: &str) -> Result<Option<String>, Error> {
        let key = key.to_string();
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt = conn.prepare("SELECT value FROM annotations WHERE key = ?1 AND expires_at > ?2")?;

                let result = stmt.query_row(params![key, now], |row| row.get(0));

                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Get the expiry time of a cached annotation, expired or not.
    pub async fn annotation_expires_at(&self, key: &str) -> Result<Option<DateTime<Utc>>, Error> {
        let key = key.to_string();
        let raw: Option<String> = self
            .conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let result = conn.query_row("SELECT expires_at FROM annotations WHERE key = ?1", params![key], |row| {
                    row.get(0)
                });

                match result {
                    Ok(expires_at) => Ok(Some(expires_at)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        raw.map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| Error::CorruptTimestamp(s))
        })
        .transpose()
    }

    /// Insert or replace a cached annotation.
    ///
    /// Uses UPSERT semantics: the last write for a key wins.
    pub async fn put_annotation(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        let key = key.to_string();
        let value = value.to_string();

        let now = Utc::now();
        let stored_at = timestamp(now);
        let expires_at = timestamp(expiry(now, ttl));

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO annotations (key, value, stored_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        stored_at = excluded.stored_at,
                        expires_at = excluded.expires_at",
                    params![key, value, stored_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete expired annotations.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired_annotations(&self) -> Result<u64, Error> {
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM annotations WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every cached annotation.
    pub async fn purge_all_annotations(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM annotations", [])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Count total and expired annotations.
    pub async fn annotation_stats(&self) -> Result<CacheStats, Error> {
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<CacheStats, Error> {
                let (total, expired): (i64, i64) = conn.query_row(
                    "SELECT COUNT(*), COALESCE(SUM(expires_at <= ?1), 0) FROM annotations",
                    params![now],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?;
                Ok(CacheStats { total: total as u64, expired: expired as u64 })
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait::async_trait]
impl CacheStore for CacheDb {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.get_annotation(key).await
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        self.put_annotation(key, value, ttl).await
    }
}
