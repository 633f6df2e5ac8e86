//! Nano API - image-generation service for Discord-style cards
//!
//! Binary entry point: configuration, background sweeps and the HTTP server.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nano_api::{create_router, spawn_sweep_task, AppState, Config, SweepHandle};

/// Main entry point for the card service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load `.env` if present, then configuration from the environment
/// 3. Build the caches, outbound client and renderer
/// 4. Start one background sweep per cache
/// 5. Serve HTTP on the configured port
/// 6. On SIGINT/SIGTERM stop accepting, drain, and stop the sweeps
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nano_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Nano API");

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    let config = Config::from_env().context("invalid configuration")?;
    info!(
        "Configuration loaded: port={}, user_ttl={:?}, image_ttl={:?}, rank_ttl={:?}, assets={}",
        config.server_port,
        config.user_cache_ttl,
        config.image_cache_ttl,
        config.rank_cache_ttl,
        config.assets_dir.display()
    );

    let state = AppState::from_config(&config).context("failed to build application state")?;

    let sweeps = vec![
        spawn_sweep_task(state.users.cache().clone(), config.user_sweep_interval),
        spawn_sweep_task(state.images.cache().clone(), config.image_sweep_interval),
        spawn_sweep_task(state.rank_images.clone(), config.rank_sweep_interval),
    ];
    info!("Started {} cache sweep tasks", sweeps.len());

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    stop_sweeps(&sweeps);
    info!("Server shutdown complete");
    Ok(())
}

fn stop_sweeps(sweeps: &[SweepHandle]) {
    for sweep in sweeps {
        sweep.stop();
        info!("Stopped {} cache sweep", sweep.name());
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
