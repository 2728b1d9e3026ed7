//! In-memory cache for message summaries
//!
//! Keys are normalized messages (lowercased, trimmed) so retries of the same
//! message skip the LLM call. Hit and miss counters feed the stats endpoint.

use std::sync::atomic::{AtomicU64, Ordering};

use moka::future::Cache;
use serde::Serialize;

/// A cached summary with the timestamp of its generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSummary {
    pub summary: String,
    pub timestamp: String,
}

/// Request and cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_miss: u64,
}

/// Summary cache with request statistics.
pub struct SummaryCache {
    entries: Cache<String, CachedSummary>,
    total_requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_miss: AtomicU64,
}

impl SummaryCache {
    /// Create a cache bounded to `capacity` entries.
    pub fn new(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
            total_requests: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_miss: AtomicU64::new(0),
        }
    }

    /// Normalize a message for use as a cache key.
    pub fn normalize_key(message: &str) -> String {
        message.trim().to_lowercase()
    }

    /// Count an incoming request.
    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Look up a cached summary, counting the hit or miss.
    pub async fn get(&self, message: &str) -> Option<CachedSummary> {
        let cached = self.entries.get(&Self::normalize_key(message)).await;
        match cached {
            Some(_) => self.cache_hits.fetch_add(1, Ordering::Relaxed),
            None => self.cache_miss.fetch_add(1, Ordering::Relaxed),
        };
        cached
    }

    /// Store a summary for a message.
    pub async fn insert(&self, message: &str, cached: CachedSummary) {
        self.entries.insert(Self::normalize_key(message), cached).await;
    }

    /// Current statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_miss: self.cache_miss.load(Ordering::Relaxed),
        }
    }

    /// Drop all entries and reset statistics.
    pub fn clear(&self) {
        self.entries.invalidate_all();
        self.total_requests.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_miss.store(0, Ordering::Relaxed);
    }
}
