use crate::error::Result as ServerErrorResult;

use wp_config::{BackendKind, Config};
use wp_sync::{BroadcastBackend, BroadcastConfig, Clock, InMemoryBackend, SqliteBackend};

use std::sync::Arc;

use log::info;

/// Create the broadcast backend selected by `sync.backend`
pub async fn build_backend(
    config: &Config,
    clock: Arc<dyn Clock>,
) -> ServerErrorResult<Arc<dyn BroadcastBackend>> {
    let broadcast_config = BroadcastConfig::from(&config.sync);

    match config.sync.backend {
        BackendKind::Memory => {
            info!("Broadcast backend: in-memory (single process)");
            Ok(Arc::new(InMemoryBackend::new(broadcast_config, clock)))
        }
        BackendKind::Sqlite => {
            let database_path = config.database_path()?;
            info!("Broadcast backend: sqlite at {}", database_path.display());

            let pool = wp_db::open_pool(&database_path).await?;
            info!("Running database migrations...");
            wp_db::run_migrations(&pool).await?;
            info!("Migrations complete");

            Ok(Arc::new(SqliteBackend::new(pool, broadcast_config, clock)))
        }
    }
}
