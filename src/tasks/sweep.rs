//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries, so
//! entries that are never read again do not linger in memory waiting for
//! a lazy check. Each pass is one bounded traversal; the next pass is
//! scheduled only after the previous one completes, so passes never
//! overlap under load.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStore, EstimateSize};

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task sleeps for `check_period_secs`, then acquires the store's
/// write lock for a single `cleanup_expired` pass, then reschedules.
/// A period of `0` disables the sweep entirely and returns `None`.
///
/// The returned JoinHandle is used to stop the sweep on engine close;
/// after `abort()` no further passes run.
pub fn spawn_sweep_task<V>(
    store: Arc<RwLock<CacheStore<V>>>,
    check_period_secs: u64,
) -> Option<JoinHandle<()>>
where
    V: Clone + EstimateSize + Send + Sync + 'static,
{
    if check_period_secs == 0 {
        debug!("expiry sweep disabled (check period 0)");
        return None;
    }

    let interval = Duration::from_secs(check_period_secs);

    Some(tokio::spawn(async move {
        info!(
            "starting expiry sweep task with interval of {} seconds",
            check_period_secs
        );

        loop {
            // Sleep first, then sweep; rescheduling after completion keeps
            // passes from overlapping when a pass runs long.
            tokio::time::sleep(interval).await;

            let removed = {
                let mut store = store.write().await;
                store.cleanup_expired()
            };

            if removed > 0 {
                info!("expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("expiry sweep: no expired entries found");
            }
        }
    }))
}
