use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use rps_persistence::{PlayerRepository, connect_and_migrate};
use rps_server::{config::Config, create_routes};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        // Closing repository spans log how long each write took.
        .with_span_events(FmtSpan::CLOSE)
        .init();

    info!("Starting RPS Arena server...");

    let config = Config::new()?;

    // Initialize database connection and run migrations
    let db = connect_and_migrate(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database_url))?;
    let player_repository = Arc::new(PlayerRepository::new(db));

    let routes = create_routes(player_repository, &config.cors_origin);

    info!("Server starting on {}:{}", config.host, config.port);

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown((config.host, config.port), shutdown_signal())
        .context("Failed to bind server address")?;

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => info!("Received SIGINT, shutting down gracefully..."),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully..."),
    }
}
