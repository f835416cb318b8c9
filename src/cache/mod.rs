//! Cache module for storing forecast responses
//!
//! This module provides an expiring key-value cache that stamps every entry
//! with its write time and treats entries older than a caller-supplied window
//! as absent. Storage and time are injected so the cache can run against the
//! filesystem in production and against memory with a manual clock in tests.

mod clock;
mod manager;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::{CacheError, ExpiringCache, FetchError, DEFAULT_EXPIRY_MS};
pub use store::{FileStore, MemoryStore, TextStore};
