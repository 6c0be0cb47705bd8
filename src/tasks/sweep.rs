//! TTL Sweep Task
//!
//! Background task that periodically removes expired entries from one store.

use std::sync::{Mutex, PoisonError, Weak};
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::store::StoreState;
use crate::cache::CacheKey;

/// Spawns a task that sweeps expired keys out of `state` every `interval`.
///
/// The task only holds a weak reference: it exits on its own once the store
/// is gone. The store aborts it through the returned handle on flush and drop.
/// The mutex is held for the duration of each sweep pass.
pub(crate) fn spawn_sweep_task<K, V>(
    runtime: &Handle,
    state: Weak<Mutex<StoreState<K, V>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    K: CacheKey,
    V: Send + 'static,
{
    runtime.spawn(async move {
        debug!("Starting TTL sweep task with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Some(state) = state.upgrade() else {
                debug!("Store dropped, stopping TTL sweep task");
                break;
            };

            let removed = {
                let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
                guard.sweep_expired(Instant::now())
            };

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}
