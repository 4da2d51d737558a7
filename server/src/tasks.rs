//! Background loops owned by a running [`Server`](crate::Server).

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use vpncheck_core::RangeRegistry;

use crate::StatsStore;

/// Re-fetches both lists every `every`. The first tick is skipped since startup
/// has just refreshed.
pub(crate) fn spawn_refresh(registry: Arc<RangeRegistry>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match registry.refresh().await {
                Ok(summary) => info!(
                    ipv4 = summary.ipv4_count,
                    ipv6 = summary.ipv6_count,
                    "Scheduled refresh complete"
                ),
                Err(e) if e.is_partial() => warn!("Scheduled refresh: {e}"),
                Err(e) => error!("Scheduled refresh: {e}"),
            }
        }
    })
}

/// Writes the stats file whenever it has unsaved changes.
pub(crate) fn spawn_stats_flush(stats: Arc<StatsStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let store = Arc::clone(&stats);
            match tokio::task::spawn_blocking(move || store.flush()).await {
                Ok(Ok(true)) => debug!("Flushed ping statistics"),
                Ok(Ok(false)) => {}
                Ok(Err(e)) => error!("Failed to save ping statistics: {e}"),
                Err(e) => error!("Stats flush task failed: {e}"),
            }
        }
    })
}
