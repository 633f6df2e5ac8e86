//! Cache Statistics Module
//!
//! Tracks how lookups were served: fresh hits, coalesced joins, and fetches.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a fresh entry
    pub hits: u64,
    /// Lookups that started a new fetch
    pub misses: u64,
    /// Lookups that joined an in-flight fetch
    pub coalesced: u64,
    /// Fetches that failed (never cached)
    pub failures: u64,
    /// Entries removed by the sweep
    pub evictions: u64,
    /// Current number of stored entries (fresh or not yet swept)
    pub total_entries: usize,
    /// Current number of in-flight fetches
    pub pending: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Share of lookups that did not trigger an upstream fetch.
    ///
    /// Coalesced joins count as hits. Returns 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.coalesced + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits + self.coalesced) as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_coalesced(&mut self) {
        self.coalesced += 1;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    /// Adds `count` swept entries.
    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }
}
