use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::Result;
use crate::services::sync_service::{SyncService, SyncStats};

/// Runs a sync every `interval`, forever.
pub struct SyncScheduler {
    service: Arc<SyncService>,
    interval: Duration,
}

impl SyncScheduler {
    pub fn new(service: Arc<SyncService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits one interval before each run; a failed run is logged and the
    /// loop continues.
    pub async fn start(self) {
        info!("Starting auto-sync scheduler (interval: {:?})", self.interval);

        loop {
            tokio::time::sleep(self.interval).await;

            match self.run_sync().await {
                Ok(stats) => {
                    info!(
                        "Auto-sync completed - {} courses, {} aliases",
                        stats.courses_stored, stats.aliases_stored
                    );
                }
                Err(e) => {
                    warn!("Auto-sync failed: {:?}", e);
                }
            }
        }
    }

    async fn run_sync(&self) -> Result<SyncStats> {
        self.service.sync_all().await
    }
}
