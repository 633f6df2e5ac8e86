//! Cache Sweep Task
//!
//! Background task that periodically removes expired cache entries. Reads
//! already treat expired entries as absent, so the sweep only bounds memory.

use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ResourceCache;

/// Owned handle to a running sweep task.
///
/// Dropping the handle leaves the task running; call [`SweepHandle::stop`]
/// during shutdown.
#[derive(Debug)]
pub struct SweepHandle {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl SweepHandle {
    /// Name of the cache being swept.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Cancels the task. Idempotent.
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns a background task that sweeps `cache` every `interval`.
///
/// The first sweep runs one full interval after spawning.
///
/// # Example
/// ```ignore
/// let users = ResourceCache::new("users", Duration::from_secs(3600));
/// let sweep = spawn_sweep_task(users.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweep.stop();
/// ```
pub fn spawn_sweep_task<K, V>(cache: ResourceCache<K, V>, interval: Duration) -> SweepHandle
where
    K: Eq + Hash + Clone + fmt::Display + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    let name = cache.name();

    let handle = tokio::spawn(async move {
        info!(
            "Starting {} cache sweep with interval of {:?}",
            cache.name(),
            interval
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.evict_expired().await;

            if removed > 0 {
                let remaining = cache.len().await;
                info!(
                    "{} cache sweep: removed {} expired entries, {} remaining",
                    cache.name(),
                    removed,
                    remaining
                );
            } else {
                debug!("{} cache sweep: no expired entries found", cache.name());
            }
        }
    });

    SweepHandle { name, handle }
}
