use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use evently_api::{router, telemetry, AppState, ServerConfig, StoreBackend};
use evently_core::{
    EventRepository, EventService, MemoryEventRepository, RankerConfig, SimilarEventsRanker,
};
use evently_db::{Database, PoolConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let _log_guard = telemetry::init_tracing();

    let config = ServerConfig::from_env()?;
    info!(
        subsystem = "api",
        store_backend = %config.store_backend,
        similar_candidate_multiplier = config.similar_candidate_multiplier,
        "Configuration loaded"
    );

    let repo: Arc<dyn EventRepository> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;

            info!("Connecting to database...");
            let db = Database::connect_with_config(
                url,
                PoolConfig::new().max_connections(config.db_max_connections),
            )
            .await?;
            info!("Database connected");

            info!("Running database migrations...");
            db.migrate().await?;
            info!("Database migrations complete");

            Arc::new(db.events.clone())
        }
        StoreBackend::Memory => {
            warn!("Using in-memory event store; data is lost on shutdown");
            Arc::new(MemoryEventRepository::new())
        }
    };

    let ranker = SimilarEventsRanker::new(RankerConfig {
        candidate_multiplier: config.similar_candidate_multiplier,
    });
    let state = AppState::new(EventService::new(repo, ranker));
    let app = router(state, &config.cors_origin);

    let addr = config.bind_addr()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
