//! Expiry Sweeper
//!
//! Background task that periodically purges expired entries from both cache
//! tiers. Reads never depend on it having run; it only reclaims space.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::CatalogCache;

/// Whether a sweep is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweeperState {
    Idle,
    Sweeping,
}

// == Sweeper Handle ==
/// Handle to the running sweep task.
#[derive(Debug)]
pub struct Sweeper {
    handle: JoinHandle<()>,
    sweeping: Arc<AtomicBool>,
    completed: Arc<AtomicU64>,
}

impl Sweeper {
    pub fn state(&self) -> SweeperState {
        if self.sweeping.load(Ordering::Acquire) {
            SweeperState::Sweeping
        } else {
            SweeperState::Idle
        }
    }

    /// Number of sweeps finished since the task started.
    pub fn completed_sweeps(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    /// Stops the task. A sweep in progress is dropped at its next await point.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns the expiry sweeper.
///
/// A single repeating timer drives one task, so sweeps never overlap; ticks
/// missed while a sweep holds the lock are skipped rather than queued. The
/// first sweep runs one `interval` after spawning.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(CatalogCache::<String>::memory_only(&config)));
/// let sweeper = spawn_sweeper(cache.clone(), config.sweep_interval);
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper<V>(cache: Arc<RwLock<CatalogCache<V>>>, interval: Duration) -> Sweeper
where
    V: Clone + Send + Sync + 'static,
{
    let interval = interval.max(Duration::from_millis(1));
    let sweeping = Arc::new(AtomicBool::new(false));
    let completed = Arc::new(AtomicU64::new(0));

    let task_sweeping = Arc::clone(&sweeping);
    let task_completed = Arc::clone(&completed);

    let handle = tokio::spawn(async move {
        info!("Starting expiry sweeper with interval of {:?}", interval);

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let report = {
                let mut cache_guard = cache.write().await;
                // No await until the flag is cleared, so an abort cannot
                // leave it set.
                task_sweeping.store(true, Ordering::Release);
                let report = cache_guard.sweep_expired();
                task_sweeping.store(false, Ordering::Release);
                report
            };
            task_completed.fetch_add(1, Ordering::AcqRel);

            if report.total() > 0 {
                info!(
                    "Expiry sweep: removed {} memory entries, {} persistent records",
                    report.memory_removed, report.persistent_removed
                );
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    });

    Sweeper {
        handle,
        sweeping,
        completed,
    }
}
