//! Expiration Index Module
//!
//! Tracks absolute deadlines for keys stored with a TTL. Keys stored without
//! a TTL never appear here.

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

// == Deadline ==
/// Computes the absolute deadline for an entry written at `now` with `ttl`.
///
/// A zero TTL yields a deadline of `now`, which is already expired. A TTL too
/// large to represent as an `Instant` yields `None` (the entry never expires).
pub fn deadline_after(now: Instant, ttl: Duration) -> Option<Instant> {
    now.checked_add(ttl)
}

/// Boundary condition: a deadline equal to `now` is expired.
pub fn is_past(deadline: Instant, now: Instant) -> bool {
    deadline <= now
}

// == Expiration Index ==
/// Map from key to absolute expiry instant, plus the same pairs ordered by
/// deadline so sweeps only visit entries that are actually due.
#[derive(Debug, Default)]
pub struct ExpirationIndex {
    deadlines: HashMap<String, Instant>,
    by_deadline: BTreeSet<(Instant, String)>,
}

impl ExpirationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // == Track ==
    /// Records (or replaces) the deadline for `key`.
    pub fn track(&mut self, key: String, deadline: Instant) {
        if let Some(previous) = self.deadlines.insert(key.clone(), deadline) {
            self.by_deadline.remove(&(previous, key.clone()));
        }
        self.by_deadline.insert((deadline, key));
    }

    // == Forget ==
    /// Drops any deadline for `key`. Returns true if one existed.
    pub fn forget(&mut self, key: &str) -> bool {
        match self.deadlines.remove_entry(key) {
            Some((key, deadline)) => {
                self.by_deadline.remove(&(deadline, key));
                true
            }
            None => false,
        }
    }

    pub fn deadline(&self, key: &str) -> Option<Instant> {
        self.deadlines.get(key).copied()
    }

    // == Is Expired ==
    /// Returns true when `key` carries a deadline that has passed at `now`.
    /// Keys without a deadline never expire.
    pub fn is_expired(&self, key: &str, now: Instant) -> bool {
        self.deadlines
            .get(key)
            .is_some_and(|&deadline| is_past(deadline, now))
    }

    // == Remaining ==
    /// Remaining lifetime of `key` at `now`.
    ///
    /// - `None` if the key has no deadline
    /// - `Some(Duration::ZERO)` if the deadline has passed
    pub fn remaining(&self, key: &str, now: Instant) -> Option<Duration> {
        self.deadlines
            .get(key)
            .map(|&deadline| deadline.saturating_duration_since(now))
    }

    // == Expired Keys ==
    /// Collects at most `limit` keys whose deadline has passed at `now`,
    /// earliest deadline first. Stops at the first deadline still in the
    /// future, so the work is bounded by `limit`.
    pub fn expired_keys(&self, now: Instant, limit: usize) -> Vec<String> {
        self.by_deadline
            .iter()
            .take_while(|(deadline, _)| is_past(*deadline, now))
            .take(limit)
            .map(|(_, key)| key.clone())
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.deadlines.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
        self.by_deadline.clear();
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
