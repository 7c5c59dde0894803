use wp_server::{AppState, ServerError, build_backend, build_router, logger};

use wp_auth::JwtValidator;
use wp_sync::{Clock, Metrics, ShutdownCoordinator, SystemClock, spawn_retention_worker};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // .env is optional; WP_* variables may also come from the environment
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config = wp_config::Config::load()?;
    config.validate()?;

    // Initialize logger (before any other logging)
    let log_file_path = config.log_file_path()?;
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting wp-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics {
            message: e.to_string(),
        })?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let backend = build_backend(&config, Arc::clone(&clock)).await?;

    // Create JWT validator (optional based on auth.enabled)
    let jwt_validator: Option<Arc<JwtValidator>> = if config.auth.enabled {
        let validator = if let Some(ref secret) = config.auth.jwt_secret {
            info!("JWT: HS256 authentication enabled");
            JwtValidator::with_hs256(secret.as_bytes())
        } else if let Some(ref key_path) = config.auth.jwt_public_key_path {
            let config_dir = wp_config::Config::config_dir()?;
            let full_path = config_dir.join(key_path);
            let public_key =
                std::fs::read_to_string(&full_path).map_err(|e| ServerError::JwtKeyFile {
                    path: full_path.display().to_string(),
                    source: e,
                })?;
            info!("JWT: RS256 authentication enabled");
            JwtValidator::with_rs256(&public_key)?
        } else {
            // validate() requires one of the two when auth is enabled
            let e = wp_config::ConfigError::auth("no JWT secret or public key configured");
            return Err(e.into());
        };
        Some(Arc::new(validator))
    } else {
        warn!(
            "Authentication DISABLED - sessions default to tenant '{}'",
            config.auth.default_tenant_id
        );
        None
    };

    let shutdown = ShutdownCoordinator::new();

    let retention = spawn_retention_worker(
        Arc::clone(&backend),
        Duration::from_secs(config.sync.trim_interval_secs),
        Metrics::new(),
        shutdown.subscribe_guard(),
    );

    let app_state = AppState::new(&config, backend, clock, jwt_validator, shutdown.clone());

    let app = build_router(app_state, config.server.max_connections).route(
        "/metrics",
        axum::routing::get(move || {
            let prometheus = prometheus.clone();
            async move { prometheus.render() }
        }),
    );

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.subscribe_guard().wait().await;
            info!("Graceful shutdown complete");
        })
        .await?;

    if let Err(e) = retention.await {
        warn!("Retention worker did not stop cleanly: {}", e);
    }

    Ok(())
}
