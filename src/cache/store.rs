//! Cache Store Module
//!
//! Generic TTL cache with request coalescing: concurrent lookups of the same
//! missing key share a single producer run.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats};
use crate::error::{AppError, Result};

/// An in-flight producer run that every waiter on the key polls.
type PendingFetch<V> = Shared<BoxFuture<'static, Result<V>>>;

/// Mutable state; lookups and pending registration happen under one lock.
struct Inner<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    pending: HashMap<K, PendingFetch<V>>,
    stats: CacheStats,
}

// == Resource Cache ==
/// TTL cache keyed by a resource identifier.
///
/// Cheap to clone; clones share the same storage. Failures are never stored,
/// so the next lookup after a failed fetch retries the producer.
pub struct ResourceCache<K, V> {
    /// Label used in logs and stats
    name: &'static str,
    /// TTL applied by [`ResourceCache::get_or_fetch`]
    default_ttl: Duration,
    inner: Arc<Mutex<Inner<K, V>>>,
}

impl<K, V> Clone for ResourceCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            default_ttl: self.default_ttl,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> fmt::Debug for ResourceCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCache")
            .field("name", &self.name)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl<K, V> ResourceCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Display + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `name` - Label for logs and statistics
    /// * `default_ttl` - Lifetime of entries stored by `get_or_fetch`
    pub fn new(name: &'static str, default_ttl: Duration) -> Self {
        Self {
            name,
            default_ttl,
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                pending: HashMap::new(),
                stats: CacheStats::new(),
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Get Or Fetch ==
    /// Returns the cached value for `key`, or computes it with `producer`.
    ///
    /// Uses the cache's default TTL. See [`ResourceCache::get_or_fetch_with_ttl`].
    pub async fn get_or_fetch<F, Fut>(&self, key: K, producer: F) -> Result<V>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        self.get_or_fetch_with_ttl(key, self.default_ttl, producer).await
    }

    /// Returns the cached value for `key`, or computes it with `producer`.
    ///
    /// - A fresh entry is returned without suspending on the producer.
    /// - If a fetch for `key` is already in flight, the caller waits for it and
    ///   receives its result or its error; `producer` is dropped uncalled.
    /// - Otherwise the fetch is registered as pending before `producer` runs. On
    ///   success the value is stored with `ttl`; on failure nothing is stored.
    ///   Either way the pending slot is cleared as soon as the fetch settles.
    ///   A producer that panics settles as [`AppError::Internal`].
    ///
    /// The fetch is driven by a spawned task, so it settles and clears its
    /// pending slot even if every waiter is cancelled.
    pub async fn get_or_fetch_with_ttl<F, Fut>(
        &self,
        key: K,
        ttl: Duration,
        producer: F,
    ) -> Result<V>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let fetch = {
            let mut inner = self.inner.lock().await;

            let fresh = inner
                .entries
                .get(&key)
                .filter(|entry| !entry.is_expired())
                .map(|entry| entry.value.clone());
            if let Some(value) = fresh {
                inner.stats.record_hit();
                return Ok(value);
            }

            if let Some(pending) = inner.pending.get(&key).cloned() {
                inner.stats.record_coalesced();
                debug!(cache = self.name, key = %key, "joining in-flight fetch");
                pending
            } else {
                inner.stats.record_miss();
                let fetch = self.settle_into_cache(key.clone(), ttl, producer);
                inner.pending.insert(key, fetch.clone());
                tokio::spawn(fetch.clone());
                fetch
            }
        };

        fetch.await
    }

    /// Wraps `producer` so that its settlement updates the maps exactly once.
    fn settle_into_cache<F, Fut>(&self, key: K, ttl: Duration, producer: F) -> PendingFetch<V>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let name = self.name;

        async move {
            // A panicking producer settles as an error
            let result = AssertUnwindSafe(async move { producer().await })
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(AppError::Internal("fetch panicked".to_string())));

            let mut inner = inner.lock().await;
            inner.pending.remove(&key);
            match &result {
                Ok(value) => {
                    inner
                        .entries
                        .insert(key, CacheEntry::new(value.clone(), ttl));
                }
                Err(err) => {
                    inner.stats.record_failure();
                    warn!(cache = name, key = %key, error = %err, "fetch failed; not cached");
                }
            }

            result
        }
        .boxed()
        .shared()
    }

    // == Peek ==
    /// Returns the value for `key` if a fresh entry exists, without fetching.
    pub async fn peek(&self, key: &K) -> Option<V> {
        let inner = self.inner.lock().await;
        inner
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    // == Evict Expired ==
    /// Physically removes every expired entry.
    ///
    /// Returns the number of entries removed. In-flight fetches are untouched.
    pub async fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut inner = self.inner.lock().await;

        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - inner.entries.len();

        inner.stats.record_evictions(removed);
        removed
    }

    // == Length ==
    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.entries.is_empty()
    }

    /// Number of fetches currently in flight.
    pub async fn pending_len(&self) -> usize {
        self.inner.lock().await.pending.len()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().await;
        let mut stats = inner.stats.clone();
        stats.total_entries = inner.entries.len();
        stats.pending = inner.pending.len();
        stats
    }
}
