use std::sync::Arc;

use tracing::info;

use classroom_sync::SyncConfig;
use classroom_sync::classroom::ClassroomHttpClient;
use classroom_sync::db::SqliteStore;
use classroom_sync::logging::{self, CsvLogSink, LogSink, TeeLogSink, TracingLogSink};
use classroom_sync::services::{SyncScheduler, SyncService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::init_tracing();

    let config = SyncConfig::new_from_env()?;

    let store = SqliteStore::connect(&config.database_url, config.credential()?).await?;
    let client = ClassroomHttpClient::new(config.api_base.clone())?;

    // Held until exit so queued CSV rows are flushed.
    let (csv_sink, _log_guard) = CsvLogSink::new(&config.log_file)?;
    let sinks: Vec<Arc<dyn LogSink>> = vec![
        Arc::new(TracingLogSink) as Arc<dyn LogSink>,
        Arc::new(csv_sink),
    ];

    let sync_interval = config.sync_interval;
    let service = Arc::new(SyncService::new(
        Arc::new(store),
        Arc::new(client),
        Arc::new(TeeLogSink::new(sinks)),
        config,
    ));

    match sync_interval {
        Some(interval) => {
            SyncScheduler::new(service, interval).start().await;
        }
        None => {
            let stats = service.sync_all().await?;
            info!(
                "synced {} courses and {} aliases",
                stats.courses_stored, stats.aliases_stored
            );
        }
    }

    Ok(())
}
