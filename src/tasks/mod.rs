//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Expiry sweep: purges expired entries from both tiers at a fixed interval

mod sweeper;

pub use sweeper::{spawn_sweeper, Sweeper, SweeperState};
