//! Key Pattern Module
//!
//! Parses the key patterns accepted by bulk deletion. Only one wildcard form
//! is supported: a trailing `*` meaning "prefix match".

use std::fmt;

use serde::{Deserialize, Serialize};

// == Key Pattern ==
/// A parsed deletion pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPattern<'a> {
    /// `user:*` matches every key starting with `user:`.
    /// A bare `*` matches every key.
    Prefix(&'a str),
    /// Any pattern without a trailing `*` matches one key exactly.
    Exact(&'a str),
}

impl<'a> KeyPattern<'a> {
    // == Parse ==
    /// Only the final `*` is treated as a wildcard; a `*` anywhere else is a
    /// literal character.
    pub fn parse(pattern: &'a str) -> Self {
        match pattern.strip_suffix('*') {
            Some(prefix) => KeyPattern::Prefix(prefix),
            None => KeyPattern::Exact(pattern),
        }
    }

    // == Matches ==
    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyPattern::Prefix(prefix) => key.starts_with(prefix),
            KeyPattern::Exact(exact) => key == *exact,
        }
    }
}

impl fmt::Display for KeyPattern<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPattern::Prefix(prefix) => write!(f, "{}*", prefix),
            KeyPattern::Exact(exact) => f.write_str(exact),
        }
    }
}

// == Pattern Scope ==
/// Which keys are candidates for pattern deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternScope {
    /// Every stored key, with or without a TTL.
    #[default]
    AllKeys,
    /// Only keys that were stored with a TTL. Keys written by a plain `set`
    /// are never matched.
    TtlTracked,
}

impl PatternScope {
    /// Parses `all` / `ttl` (case-insensitive). Returns `None` otherwise.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "all" | "all_keys" => Some(PatternScope::AllKeys),
            "ttl" | "ttl_tracked" => Some(PatternScope::TtlTracked),
            _ => None,
        }
    }
}
