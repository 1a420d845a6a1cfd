//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod expiry;
mod lru;
mod observer;
mod pattern;
mod stats;
mod store;


// Re-export public types
pub use expiry::ExpirationIndex;
pub use lru::LruStore;
pub use observer::{CacheEvent, CacheObserver, NoopObserver, TracingObserver};
pub use pattern::{KeyPattern, PatternScope};
pub use stats::CacheStats;
pub use store::{BoundedTtlCache, CacheBuilder};
