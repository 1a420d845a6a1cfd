//! Bounded TTL Cache - A capacity-bounded in-memory cache
//!
//! Provides a thread-safe key-value store with LRU eviction, optional
//! per-entry TTL with lazy expiry, prefix pattern deletion and hit/miss
//! statistics.
//!
//! ```
//! use std::time::Duration;
//! use bounded_ttl_cache::BoundedTtlCache;
//!
//! let cache = BoundedTtlCache::new(2).unwrap();
//! cache.set("a", 1);
//! cache.set_with_ttl("b", 2, Duration::from_secs(60));
//! cache.get("a");
//! cache.set("c", 3); // evicts "b"
//!
//! assert_eq!(cache.get("b"), None);
//! assert_eq!(cache.stats().size, 2);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod tasks;

pub use cache::{
    BoundedTtlCache, CacheBuilder, CacheEvent, CacheObserver, CacheStats, NoopObserver,
    PatternScope, TracingObserver,
};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use logging::init_from_config;
pub use tasks::{spawn_sweeper, spawn_sweeper_from_config};
