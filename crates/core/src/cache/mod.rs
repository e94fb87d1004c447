//! Content-addressed annotation cache.
//!
//! The pipeline only sees the [`CacheStore`] capability. Two backends
//! implement it:
//!
//! - [`CacheDb`]: persistent SQLite storage via tokio-rusqlite, with
//!   versioned migrations and eager purging of expired rows
//! - [`MemoryCache`]: process-local map with lazy expiry

pub mod annotations;
pub mod connection;
pub mod hash;
pub mod memory;
pub mod migrations;

use std::time::Duration;

pub use crate::Error;

pub use annotations::CacheStats;
pub use connection::CacheDb;
pub use hash::fingerprint;
pub use memory::MemoryCache;

/// Minimal get/put capability the annotation pipeline caches through.
///
/// Implementations must never return an entry whose TTL has elapsed.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch an unexpired value by key.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store a value under key, replacing any previous entry.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error>;
}
