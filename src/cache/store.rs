//! Cache Store Module
//!
//! Main cache engine combining the LRU store with the expiration index
//! behind a single lock.

use std::fmt;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::warn;

use crate::cache::expiry::{deadline_after, ExpirationIndex};
use crate::cache::{
    CacheEvent, CacheObserver, CacheStats, KeyPattern, LruStore, NoopObserver, PatternScope,
    TracingObserver,
};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Inner State ==
/// Everything the lock protects. Both structures and the counters are
/// always mutated together.
#[derive(Debug)]
struct Inner<V> {
    entries: LruStore<V>,
    ttl_index: ExpirationIndex,
    stats: CacheStats,
}

enum Lookup<V> {
    Hit(V),
    Miss,
    Expired,
}

impl<V> Inner<V> {
    fn store(&mut self, key: String, value: V, deadline: Option<Instant>) -> Option<String> {
        let evicted = self.entries.put(key.clone(), value).map(|(evicted_key, _)| {
            self.ttl_index.forget(&evicted_key);
            self.stats.record_eviction();
            evicted_key
        });

        match deadline {
            Some(deadline) => self.ttl_index.track(key, deadline),
            None => {
                self.ttl_index.forget(&key);
            }
        }

        evicted
    }

    fn lookup(&mut self, key: &str, now: Instant) -> Lookup<V>
    where
        V: Clone,
    {
        if self.ttl_index.is_expired(key, now) {
            self.ttl_index.forget(key);
            self.stats.record_miss();
            if self.entries.remove(key).is_some() {
                self.stats.record_expirations(1);
                return Lookup::Expired;
            }
            return Lookup::Miss;
        }

        match self.entries.get(key).cloned() {
            Some(value) => {
                self.stats.record_hit();
                Lookup::Hit(value)
            }
            None => {
                self.stats.record_miss();
                Lookup::Miss
            }
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        self.ttl_index.forget(key);
        self.entries.remove(key).is_some()
    }

    fn remove_matching(&mut self, pattern: &KeyPattern<'_>, scope: PatternScope) -> usize {
        if let KeyPattern::Exact(key) = pattern {
            let candidate = match scope {
                PatternScope::AllKeys => self.entries.contains(key),
                PatternScope::TtlTracked => self.ttl_index.deadline(key).is_some(),
            };
            return usize::from(candidate && self.remove(key));
        }

        // Collect first, then delete
        let matched: Vec<String> = match scope {
            PatternScope::AllKeys => self
                .entries
                .keys()
                .filter(|key| pattern.matches(key))
                .map(str::to_string)
                .collect(),
            PatternScope::TtlTracked => self
                .ttl_index
                .keys()
                .filter(|key| pattern.matches(key))
                .map(str::to_string)
                .collect(),
        };

        matched.iter().filter(|key| self.remove(key)).count()
    }

    fn remove_expired(&mut self, now: Instant, limit: usize) -> usize {
        let expired = self.ttl_index.expired_keys(now, limit);
        let removed = expired.iter().filter(|key| self.remove(key)).count();
        self.stats.record_expirations(removed);
        removed
    }
}

// == Bounded TTL Cache ==
/// Thread-safe, capacity-bounded cache with LRU eviction and optional
/// per-entry TTL.
///
/// Values are returned by clone; wrap large values in [`Arc`] to keep reads
/// cheap. Expired entries are removed lazily on access, by
/// [`purge_expired`](Self::purge_expired), or by the background sweeper.
///
/// Every operation takes the same lock for its full duration, so operations
/// are linearizable. Observer callbacks run after the lock is released.
pub struct BoundedTtlCache<V> {
    inner: Mutex<Inner<V>>,
    observer: Arc<dyn CacheObserver>,
    pattern_scope: PatternScope,
}

impl<V> BoundedTtlCache<V> {
    // == Constructors ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Fails with [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        CacheBuilder::new(capacity).build()
    }

    /// Creates a cache that reports events to `observer`.
    pub fn with_observer(capacity: usize, observer: Arc<dyn CacheObserver>) -> Result<Self> {
        CacheBuilder::new(capacity).observer(observer).build()
    }

    /// Creates a cache from configuration, reporting through `tracing`.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        CacheBuilder::new(config.capacity)
            .pattern_scope(config.pattern_scope)
            .observer(Arc::new(TracingObserver))
            .build()
    }

    // == Set ==
    /// Stores `value` under `key` with no expiration.
    ///
    /// Any deadline previously attached to `key` is dropped, so the entry
    /// becomes permanent. Inserting a new key into a full cache evicts the
    /// least recently used entry.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.insert(key.into(), value, None);
    }

    // == Set With TTL ==
    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// A zero `ttl` stores an entry that is already expired: every later
    /// `get` misses.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.insert(key.into(), value, Some(ttl));
    }

    fn insert(&self, key: String, value: V, ttl: Option<Duration>) {
        let deadline = ttl.and_then(|ttl| deadline_after(Instant::now(), ttl));
        let event_key = self.observer.is_enabled().then(|| key.clone());

        let evicted = self.inner.lock().store(key, value, deadline);

        if let Some(key) = event_key {
            if let Some(evicted) = evicted {
                self.dispatch(&CacheEvent::Evicted { key: evicted });
            }
            self.dispatch(&CacheEvent::Set { key, ttl });
        }
    }

    // == Get ==
    /// Returns a clone of the live value for `key`.
    ///
    /// A hit marks `key` as most recently used. An expired entry is removed
    /// and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let lookup = self.inner.lock().lookup(key, Instant::now());

        match lookup {
            Lookup::Hit(value) => {
                self.notify(|| CacheEvent::Hit { key: key.to_string() });
                Some(value)
            }
            Lookup::Miss => {
                self.notify(|| CacheEvent::Miss { key: key.to_string() });
                None
            }
            Lookup::Expired => {
                self.notify(|| CacheEvent::Expired { key: key.to_string() });
                None
            }
        }
    }

    // == Contains ==
    /// Returns true if `key` holds a live entry. Does not touch recency or
    /// stats.
    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        let inner = self.inner.lock();
        inner.entries.contains(key) && !inner.ttl_index.is_expired(key, now)
    }

    // == TTL Remaining ==
    /// Remaining lifetime of a live TTL entry.
    ///
    /// Returns `None` for permanent, absent, or already expired keys. Does
    /// not touch recency or stats.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let inner = self.inner.lock();
        if !inner.entries.contains(key) {
            return None;
        }
        inner
            .ttl_index
            .remaining(key, now)
            .filter(|remaining| !remaining.is_zero())
    }

    // == Delete ==
    /// Removes `key`. Returns true if an entry was stored; deleting an
    /// absent key is a no-op.
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.inner.lock().remove(key);
        self.notify(|| CacheEvent::Delete { key: key.to_string() });
        removed
    }

    // == Delete By Pattern ==
    /// Removes every key matching `pattern` and returns how many were
    /// removed.
    ///
    /// A trailing `*` makes the pattern a prefix match (`user:*`); anything
    /// else matches one key exactly. Which keys are candidates depends on
    /// the configured [`PatternScope`].
    pub fn delete_by_pattern(&self, pattern: &str) -> usize {
        let parsed = KeyPattern::parse(pattern);
        let count = self.inner.lock().remove_matching(&parsed, self.pattern_scope);

        self.notify(|| CacheEvent::DeletePattern {
            pattern: pattern.to_string(),
            count,
        });
        count
    }

    // == Clear ==
    /// Drops every entry. Hit and miss counters are kept.
    pub fn clear(&self) {
        let removed = {
            let mut inner = self.inner.lock();
            let removed = inner.entries.len();
            inner.entries.purge();
            inner.ttl_index.clear();
            removed
        };
        self.notify(|| CacheEvent::Cleared { removed });
    }

    // == Purge Expired ==
    /// Removes up to `limit` expired entries under a single lock
    /// acquisition. Returns the number removed.
    pub fn purge_expired(&self, limit: usize) -> usize {
        let removed = self.inner.lock().remove_expired(Instant::now(), limit);
        if removed > 0 {
            self.notify(|| CacheEvent::Swept { removed });
        }
        removed
    }

    // == Stats ==
    /// Returns current cache statistics. `size` counts physically stored
    /// entries, which may include expired entries not yet removed.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        inner.stats.with_size(inner.entries.len())
    }

    /// Zeroes the hit, miss, eviction and expiration counters.
    pub fn reset_stats(&self) {
        self.inner.lock().stats.reset();
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().entries.capacity()
    }

    pub fn pattern_scope(&self) -> PatternScope {
        self.pattern_scope
    }

    fn notify(&self, event: impl FnOnce() -> CacheEvent) {
        if self.observer.is_enabled() {
            self.dispatch(&event());
        }
    }

    /// Hands `event` to the observer. A panicking observer is logged and
    /// otherwise ignored; the lock is already released, so no cache state
    /// is left half-updated.
    fn dispatch(&self, event: &CacheEvent) {
        let observer = &self.observer;
        if panic::catch_unwind(AssertUnwindSafe(|| observer.on_event(event))).is_err() {
            warn!(event = event.name(), "Cache observer panicked, event dropped");
        }
    }
}

impl<V> fmt::Debug for BoundedTtlCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("BoundedTtlCache")
            .field("capacity", &inner.entries.capacity())
            .field("len", &inner.entries.len())
            .field("tracked_ttls", &inner.ttl_index.len())
            .field("pattern_scope", &self.pattern_scope)
            .finish()
    }
}

// == Builder ==
/// Builder for [`BoundedTtlCache`].
///
/// ```
/// use bounded_ttl_cache::{BoundedTtlCache, CacheBuilder, PatternScope};
///
/// let cache: BoundedTtlCache<u32> = CacheBuilder::new(128)
///     .pattern_scope(PatternScope::TtlTracked)
///     .build()
///     .unwrap();
/// assert_eq!(cache.capacity(), 128);
/// ```
#[derive(Clone)]
pub struct CacheBuilder {
    capacity: usize,
    observer: Arc<dyn CacheObserver>,
    pattern_scope: PatternScope,
}

impl CacheBuilder {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            observer: Arc::new(NoopObserver),
            pattern_scope: PatternScope::default(),
        }
    }

    pub fn observer(mut self, observer: Arc<dyn CacheObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn pattern_scope(mut self, scope: PatternScope) -> Self {
        self.pattern_scope = scope;
        self
    }

    /// Fails with [`CacheError::InvalidCapacity`] when capacity is zero.
    pub fn build<V>(self) -> Result<BoundedTtlCache<V>> {
        let capacity =
            NonZeroUsize::new(self.capacity).ok_or(CacheError::InvalidCapacity(self.capacity))?;

        Ok(BoundedTtlCache {
            inner: Mutex::new(Inner {
                entries: LruStore::new(capacity),
                ttl_index: ExpirationIndex::new(),
                stats: CacheStats::new(),
            }),
            observer: self.observer,
            pattern_scope: self.pattern_scope,
        })
    }
}
