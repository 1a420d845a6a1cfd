//! Error types for the cache
//!
//! Provides unified error handling using thiserror. Misses, expiry and
//! deleting absent keys are normal outcomes and never show up here.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A cache must be able to hold at least one entry
    #[error("Invalid capacity: {0} (must be greater than zero)")]
    InvalidCapacity(usize),

    /// An environment variable was set but could not be parsed
    #[error("Invalid configuration: {key}={value:?}")]
    InvalidConfig { key: &'static str, value: String },
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
