//! Logging Module
//!
//! Installs the process-wide `tracing` subscriber. The cache itself never
//! logs directly; it reports through [`TracingObserver`](crate::cache::TracingObserver).

use tracing::level_filters::LevelFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::CacheConfig;

/// Maps a level name to a filter. Unknown names fall back to `INFO`.
pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" | "disabled" | "none" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// Builds the filter: `RUST_LOG` wins when set, otherwise `level` applies.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(parse_level(level).into()))
}

/// Initializes the global tracing subscriber.
///
/// Fails instead of panicking when a subscriber is already installed.
pub fn init_logging(level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// Initializes the global subscriber at `config.log_level`.
pub fn init_from_config(config: &CacheConfig) -> Result<(), TryInitError> {
    init_logging(&config.log_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::DEBUG);
        assert_eq!(parse_level("WARNING"), LevelFilter::WARN);
        assert_eq!(parse_level(" error "), LevelFilter::ERROR);
        assert_eq!(parse_level("disabled"), LevelFilter::OFF);
        assert_eq!(parse_level("fatal"), LevelFilter::INFO);
    }

    #[test]
    fn test_init_logging_twice_fails() {
        let config = CacheConfig {
            log_level: "debug".to_string(),
            ..CacheConfig::default()
        };
        let _ = init_from_config(&config);
        assert!(init_logging("debug").is_err());
        assert!(init_from_config(&config).is_err());
    }
}
