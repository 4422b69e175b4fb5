//! Cache Refresh Task
//!
//! Background task that periodically reloads the most recent orders into the
//! cache, so orders written by other instances become visible without a miss.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::service::OrderService;

/// Spawns a background task calling `update_cache` every `interval_secs`.
///
/// Failures are logged and the next tick tries again. The returned handle is
/// aborted during graceful shutdown.
pub fn spawn_refresh_task(service: Arc<dyn OrderService>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache refresh task with interval of {} seconds",
            interval.as_secs()
        );

        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately; startup already warmed the cache
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match service.update_cache().await {
                Ok(loaded) => debug!(loaded, "cache refresh complete"),
                Err(e) => error!(error = %e, "cache refresh failed"),
            }
        }
    })
}
