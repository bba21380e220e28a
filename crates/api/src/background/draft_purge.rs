//! Periodic cleanup of expired proposal drafts.
//!
//! Expired resume tokens are already unredeemable; this job just keeps the
//! table from accumulating dead rows. Runs on a fixed interval using
//! `tokio::time::interval`.

use std::time::Duration;

use sqlx::PgPool;
use teian_db::repositories::DraftRepo;
use tokio_util::sync::CancellationToken;

/// How often the purge job runs.
const PURGE_INTERVAL: Duration = Duration::from_secs(600); // 10 minutes

/// Run the draft purge loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = PURGE_INTERVAL.as_secs(),
        "Draft purge job started"
    );

    let mut interval = tokio::time::interval(PURGE_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Draft purge job stopping");
                break;
            }
            _ = interval.tick() => {
                match DraftRepo::purge_expired(&pool).await {
                    Ok(purged) => {
                        if purged > 0 {
                            tracing::info!(purged, "Draft purge: removed expired drafts");
                        } else {
                            tracing::debug!("Draft purge: nothing to remove");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Draft purge failed");
                    }
                }
            }
        }
    }
}
