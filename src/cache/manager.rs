//! Expiring cache over an injected text store
//!
//! Provides an `ExpiringCache` that stores serializable data as JSON text with
//! a write timestamp. Reads take the expiry window from the caller; anything
//! older than the window, or anything that no longer parses, is purged and
//! reported as a miss.

use std::future::Future;
use std::io;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use super::store::TextStore;

/// Default expiry window of one hour
pub const DEFAULT_EXPIRY_MS: u64 = 3_600_000;

/// Wrapper struct for cached data in the backing store
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// When the data was cached, in epoch milliseconds
    timestamp: i64,
    /// The cached data
    data: T,
}

/// Errors surfaced by cache writes
#[derive(Debug, Error)]
pub enum CacheError {
    /// The payload could not be turned into JSON
    #[error("failed to serialize cache entry '{key}': {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },

    /// The backing store rejected the write (e.g., quota exceeded)
    #[error("failed to write cache entry '{key}': {source}")]
    StorageWrite { key: String, source: io::Error },
}

/// Outcome of a failed `get_or_fetch`
#[derive(Debug, Error)]
pub enum FetchError<T, E> {
    /// The fetcher failed; nothing was cached
    #[error("fetch failed: {0}")]
    Fetch(E),

    /// The fetch succeeded but the result could not be cached
    ///
    /// The fetched payload is handed back so the caller can carry on
    /// without caching.
    #[error("fetched data could not be cached: {source}")]
    Uncached { payload: T, source: CacheError },
}

/// Key-value cache that treats entries older than the expiry window as absent
///
/// Expired and malformed entries are removed on read. There is no size
/// bound and no background sweep.
#[derive(Debug)]
pub struct ExpiringCache<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: TextStore> ExpiringCache<S> {
    /// Creates a cache over `store` using the wall clock
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<S: TextStore, C: Clock> ExpiringCache<S, C> {
    /// Creates a cache over `store` using a custom clock
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Writes `payload` under `key`, stamped with the current time
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(CacheError::StorageWrite)` if the backing store rejects the write
    pub fn put<T: Serialize>(&self, key: &str, payload: &T) -> Result<(), CacheError> {
        let entry = CacheEntry {
            timestamp: self.clock.now_millis(),
            data: payload,
        };

        let json = serde_json::to_string(&entry).map_err(|source| CacheError::Serialize {
            key: key.to_string(),
            source,
        })?;

        self.store
            .write_text(key, &json)
            .map_err(|source| CacheError::StorageWrite {
                key: key.to_string(),
                source,
            })?;

        debug!(key, timestamp = entry.timestamp, "cache entry written");
        Ok(())
    }

    /// Reads `key` if it was written no more than `expiry_ms` ago
    ///
    /// Returns `None` if the entry is missing, expired, or cannot be parsed
    /// as `T`. Expired and unparseable entries are removed from the store.
    pub fn get<T: DeserializeOwned>(&self, key: &str, expiry_ms: u64) -> Option<T> {
        let text = match self.store.read_text(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!(key, error = %e, "discarding undecodable cache entry");
                self.purge(key);
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&text) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "discarding malformed cache entry");
                self.purge(key);
                return None;
            }
        };

        let age = self.clock.now_millis().saturating_sub(entry.timestamp);
        if age > i64::try_from(expiry_ms).unwrap_or(i64::MAX) {
            debug!(key, age_ms = age, expiry_ms, "cache entry expired");
            self.purge(key);
            return None;
        }

        Some(entry.data)
    }

    /// Returns the cached value for `key`, or fetches and caches a new one
    ///
    /// The fetcher only runs on a miss. A fetch error leaves the cache
    /// untouched; a failed write hands the fetched value back inside
    /// `FetchError::Uncached`.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        expiry_ms: u64,
        fetch: F,
    ) -> Result<T, FetchError<T, E>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get(key, expiry_ms) {
            debug!(key, "cache hit");
            return Ok(cached);
        }

        debug!(key, "cache miss, fetching");
        let payload = fetch().await.map_err(FetchError::Fetch)?;

        match self.put(key, &payload) {
            Ok(()) => Ok(payload),
            Err(source) => Err(FetchError::Uncached { payload, source }),
        }
    }

    fn purge(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(key, error = %e, "failed to remove cache entry");
        }
    }
}
