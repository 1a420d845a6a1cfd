//! Background Tasks Module
//!
//! Optional background work for a cache shared across tasks.
//!
//! # Tasks
//! - TTL Sweep: Removes expired cache entries at a configured interval

mod cleanup;

pub use cleanup::{spawn_sweeper, spawn_sweeper_from_config};
