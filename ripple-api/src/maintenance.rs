use ripple_db::client::DbClient;
use std::{sync::Arc, time::Duration};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Periodic feed maintenance: sweeps feed rows orphaned by soft deletions and
/// re-derives drifted like-count projection rows. A failed cycle is logged
/// and the loop keeps running; the task stops when `shutdown` is cancelled.
pub async fn run(db: Arc<DbClient>, interval: Duration, shutdown: CancellationToken) {
    info!(
        interval_secs = interval.as_secs(),
        "Starting feed maintenance task"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; skip it so a crash-restart loop does
    // not run sweeps back to back.
    ticker.tick().await;

    loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                info!("Feed maintenance task stopping");
                return;
            }
            _ = ticker.tick() => {}
        }

        match db.sweep_orphaned_feed_rows().await {
            Ok(removed) => info!(removed, "Feed sweep cycle completed"),
            Err(err) => error!(error = %err, "Feed sweep cycle failed"),
        }

        match db.reconcile_like_counts().await {
            Ok(reconciled) => info!(reconciled, "Like-count reconciliation completed"),
            Err(err) => error!(error = %err, "Like-count reconciliation failed"),
        }
    }
}
