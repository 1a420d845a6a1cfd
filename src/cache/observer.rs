//! Cache Observer Module
//!
//! Fire-and-forget telemetry hooks. The cache reports what happened to an
//! injected [`CacheObserver`] after releasing its lock; nothing an observer
//! does can change cache state or surface as an error to the caller.

use std::time::Duration;

use tracing::debug;

// == Cache Event ==
/// Something that happened inside the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    Hit { key: String },
    Miss { key: String },
    /// A lookup found the key past its deadline and removed it.
    Expired { key: String },
    Set { key: String, ttl: Option<Duration> },
    Delete { key: String },
    /// The key was dropped to make room for a new one.
    Evicted { key: String },
    DeletePattern { pattern: String, count: usize },
    Cleared { removed: usize },
    /// An explicit or background sweep removed expired entries.
    Swept { removed: usize },
}

impl CacheEvent {
    /// Short, stable event name.
    pub fn name(&self) -> &'static str {
        match self {
            CacheEvent::Hit { .. } => "hit",
            CacheEvent::Miss { .. } => "miss",
            CacheEvent::Expired { .. } => "expired",
            CacheEvent::Set { .. } => "set",
            CacheEvent::Delete { .. } => "delete",
            CacheEvent::Evicted { .. } => "evict",
            CacheEvent::DeletePattern { .. } => "delete_pattern",
            CacheEvent::Cleared { .. } => "clear",
            CacheEvent::Swept { .. } => "sweep",
        }
    }
}

// == Observer Trait ==
/// Receiver of cache events.
///
/// Called synchronously on the caller's thread, never while the cache lock
/// is held. Implementations should be quick. A panic inside `on_event` is
/// caught and logged at warn level; the cache operation that raised the
/// event still completes and returns normally.
pub trait CacheObserver: Send + Sync {
    fn on_event(&self, event: &CacheEvent);

    /// When false the cache does not build events at all.
    fn is_enabled(&self) -> bool {
        true
    }
}

// == No-op Observer ==
/// Discards everything. The default for caches built without an observer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CacheObserver for NoopObserver {
    fn on_event(&self, _event: &CacheEvent) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

// == Tracing Observer ==
/// Forwards events to `tracing` at debug level with structured fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CacheObserver for TracingObserver {
    fn on_event(&self, event: &CacheEvent) {
        match event {
            CacheEvent::Hit { key } => debug!(key = %key, cache_hit = true, "Cache hit"),
            CacheEvent::Miss { key } => debug!(key = %key, cache_hit = false, "Cache miss"),
            CacheEvent::Expired { key } => {
                debug!(key = %key, cache_hit = false, "Cache expired")
            }
            CacheEvent::Set { key, ttl: None } => debug!(key = %key, "Cache set"),
            CacheEvent::Set { key, ttl: Some(ttl) } => {
                let ttl_ms = ttl.as_millis() as u64;
                debug!(key = %key, ttl_ms, "Cache set with TTL")
            }
            CacheEvent::Delete { key } => debug!(key = %key, "Cache delete"),
            CacheEvent::Evicted { key } => debug!(key = %key, "Cache evict"),
            CacheEvent::DeletePattern { pattern, count } => {
                debug!(pattern = %pattern, count, "Cache delete by pattern")
            }
            CacheEvent::Cleared { removed } => debug!(count = removed, "Cache cleared"),
            CacheEvent::Swept { removed } => debug!(count = removed, "Cache swept"),
        }
    }

    fn is_enabled(&self) -> bool {
        tracing::enabled!(tracing::Level::DEBUG)
    }
}
