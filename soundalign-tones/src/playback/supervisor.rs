//! Liveness supervisor
//!
//! Background task that periodically checks the output worker and restarts
//! it if it died. Skips checks while the engine is disabled and exits once
//! the engine is shut down.

use crate::playback::engine::ToneEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

/// Default time between liveness checks
pub const DEFAULT_LIVENESS_INTERVAL: Duration = Duration::from_secs(5);

/// Spawn the liveness check on the current tokio runtime
pub fn spawn_liveness_supervisor(engine: Arc<ToneEngine>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(liveness_task(engine, period))
}

async fn liveness_task(engine: Arc<ToneEngine>, period: Duration) {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    info!("Liveness supervisor started ({:?} interval)", period);

    loop {
        interval.tick().await;

        if engine.is_shut_down() {
            break;
        }
        if !engine.is_enabled() {
            debug!("Tone engine disabled, skipping liveness check");
            continue;
        }

        // Opening a stream blocks, keep it off the async workers
        let check = Arc::clone(&engine);
        match tokio::task::spawn_blocking(move || check.ensure_worker()).await {
            Ok(Ok(true)) => info!(
                "Liveness check restarted the output worker: {:?}",
                engine.status()
            ),
            Ok(Ok(false)) => {}
            Ok(Err(e)) => warn!("Liveness check could not restart output worker: {}", e),
            Err(e) => warn!("Liveness check task failed: {}", e),
        }
    }

    info!("Liveness supervisor stopped");
}
