//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::PatternScope;
use crate::error::{CacheError, Result};

// == Environment Keys ==
pub const ENV_CAPACITY: &str = "CACHE_CAPACITY";
pub const ENV_SWEEP_INTERVAL_MS: &str = "CACHE_SWEEP_INTERVAL_MS";
pub const ENV_SWEEP_BATCH: &str = "CACHE_SWEEP_BATCH";
pub const ENV_PATTERN_SCOPE: &str = "CACHE_PATTERN_SCOPE";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// [`BoundedTtlCache::from_config`](crate::BoundedTtlCache::from_config) reads
/// `capacity` and `pattern_scope`;
/// [`spawn_sweeper_from_config`](crate::spawn_sweeper_from_config) reads the
/// sweep settings and [`init_from_config`](crate::init_from_config) reads
/// `log_level`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Background sweep interval in milliseconds, 0 disables the sweeper
    pub sweep_interval_ms: u64,
    /// Maximum expired entries removed per lock acquisition while sweeping
    pub sweep_batch_size: usize,
    /// Which keys pattern deletion considers
    pub pattern_scope: PatternScope,
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// Values that are missing or fail to parse fall back to the defaults.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 1000)
    /// - `CACHE_SWEEP_BATCH` - Entries removed per sweep batch (default: 128)
    /// - `CACHE_PATTERN_SCOPE` - `all` or `ttl` (default: all)
    /// - `LOG_LEVEL` - trace/debug/info/warn/error/off (default: info)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: lenient(ENV_CAPACITY, defaults.capacity),
            sweep_interval_ms: lenient(ENV_SWEEP_INTERVAL_MS, defaults.sweep_interval_ms),
            sweep_batch_size: lenient(ENV_SWEEP_BATCH, defaults.sweep_batch_size).max(1),
            pattern_scope: env::var(ENV_PATTERN_SCOPE)
                .ok()
                .and_then(|v| PatternScope::from_name(&v))
                .unwrap_or(defaults.pattern_scope),
            log_level: env::var(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
        }
    }

    /// Like [`from_env`](Self::from_env), but a variable that is set and
    /// cannot be parsed is an error instead of a silent default.
    pub fn try_from_env() -> Result<Self> {
        let defaults = Self::default();
        let pattern_scope = match env::var(ENV_PATTERN_SCOPE) {
            Ok(value) => PatternScope::from_name(&value).ok_or(CacheError::InvalidConfig {
                key: ENV_PATTERN_SCOPE,
                value,
            })?,
            Err(_) => defaults.pattern_scope,
        };

        Ok(Self {
            capacity: strict(ENV_CAPACITY, defaults.capacity)?,
            sweep_interval_ms: strict(ENV_SWEEP_INTERVAL_MS, defaults.sweep_interval_ms)?,
            sweep_batch_size: strict(ENV_SWEEP_BATCH, defaults.sweep_batch_size)?.max(1),
            pattern_scope,
            log_level: env::var(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
        })
    }

    /// Sweep interval, or `None` when the sweeper is disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_ms > 0).then(|| Duration::from_millis(self.sweep_interval_ms))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            sweep_interval_ms: 1000,
            sweep_batch_size: 128,
            pattern_scope: PatternScope::AllKeys,
            log_level: "info".to_string(),
        }
    }
}

fn lenient<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn strict<T: FromStr>(key: &'static str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| CacheError::InvalidConfig { key, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests touching the process environment share one lock.
    static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

    fn clear_env() {
        for key in [
            ENV_CAPACITY,
            ENV_SWEEP_INTERVAL_MS,
            ENV_SWEEP_BATCH,
            ENV_PATTERN_SCOPE,
            ENV_LOG_LEVEL,
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.sweep_interval_ms, 1000);
        assert_eq!(config.sweep_batch_size, 128);
        assert_eq!(config.pattern_scope, PatternScope::AllKeys);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_from_env_defaults() {
        let _guard = ENV_LOCK.lock();
        clear_env();

        assert_eq!(CacheConfig::from_env(), CacheConfig::default());
        assert_eq!(CacheConfig::try_from_env(), Ok(CacheConfig::default()));
    }

    #[test]
    fn test_config_from_env_values() {
        let _guard = ENV_LOCK.lock();
        clear_env();
        env::set_var(ENV_CAPACITY, "42");
        env::set_var(ENV_SWEEP_INTERVAL_MS, "0");
        env::set_var(ENV_SWEEP_BATCH, "0");
        env::set_var(ENV_PATTERN_SCOPE, "ttl");
        env::set_var(ENV_LOG_LEVEL, "debug");

        let config = CacheConfig::from_env();
        clear_env();

        assert_eq!(config.capacity, 42);
        assert_eq!(config.sweep_interval(), None);
        assert_eq!(config.sweep_batch_size, 1);
        assert_eq!(config.pattern_scope, PatternScope::TtlTracked);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_config_lenient_and_strict_on_garbage() {
        let _guard = ENV_LOCK.lock();
        clear_env();
        env::set_var(ENV_CAPACITY, "lots");

        let lenient = CacheConfig::from_env();
        let strict = CacheConfig::try_from_env();
        clear_env();

        assert_eq!(lenient.capacity, 1000);
        assert_eq!(
            strict,
            Err(CacheError::InvalidConfig {
                key: ENV_CAPACITY,
                value: "lots".to_string()
            })
        );
    }

    #[test]
    fn test_config_strict_rejects_unknown_scope() {
        let _guard = ENV_LOCK.lock();
        clear_env();
        env::set_var(ENV_PATTERN_SCOPE, "regex");

        let strict = CacheConfig::try_from_env();
        clear_env();

        assert!(matches!(
            strict,
            Err(CacheError::InvalidConfig {
                key: ENV_PATTERN_SCOPE,
                ..
            })
        ));
    }

    #[test]
    fn test_sweep_interval() {
        let config = CacheConfig {
            sweep_interval_ms: 250,
            ..CacheConfig::default()
        };
        assert_eq!(config.sweep_interval(), Some(Duration::from_millis(250)));
    }
}
