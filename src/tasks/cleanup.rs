//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::BoundedTtlCache;
use crate::config::CacheConfig;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// On every tick the task removes expired entries in batches of at most
/// `batch_size`, taking the cache lock once per batch, until a batch comes
/// back short. Lookups keep working between batches.
///
/// # Arguments
/// * `cache` - Shared reference to the cache
/// * `interval` - Time between sweeps
/// * `batch_size` - Maximum entries removed per lock acquisition (minimum 1)
///
/// # Returns
/// A JoinHandle for the spawned task; abort it to stop sweeping.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(BoundedTtlCache::<String>::new(1000)?);
/// let sweeper = spawn_sweeper(cache.clone(), Duration::from_secs(1), 128);
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper<V>(
    cache: Arc<BoundedTtlCache<V>>,
    interval: Duration,
    batch_size: usize,
) -> JoinHandle<()>
where
    V: Send + 'static,
{
    let batch_size = batch_size.max(1);
    // tokio rejects a zero period
    let interval = interval.max(Duration::from_millis(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL sweep task with interval of {}ms, batch size {}",
            interval.as_millis(),
            batch_size
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = sweep(&cache, batch_size).await;

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}

/// Starts the sweeper described by `config`.
///
/// Returns `None` when `sweep_interval_ms` is 0, which disables background
/// sweeping; expired entries are then only removed lazily or through
/// [`BoundedTtlCache::purge_expired`].
pub fn spawn_sweeper_from_config<V>(
    cache: Arc<BoundedTtlCache<V>>,
    config: &CacheConfig,
) -> Option<JoinHandle<()>>
where
    V: Send + 'static,
{
    let interval = config.sweep_interval()?;
    Some(spawn_sweeper(cache, interval, config.sweep_batch_size))
}

/// Drains expired entries one capped batch at a time, yielding between
/// batches.
async fn sweep<V>(cache: &BoundedTtlCache<V>, batch_size: usize) -> usize {
    let mut total = 0;
    loop {
        let removed = cache.purge_expired(batch_size);
        total += removed;
        if removed < batch_size {
            return total;
        }
        tokio::task::yield_now().await;
    }
}
