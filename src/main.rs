//! Prefix Cache - An in-memory cache server with per-prefix statistics
//!
//! Caches key-value pairs with TTL expiration and LRU eviction, and keeps
//! per-prefix traffic statistics served as plain-text reports.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod stats;
mod tasks;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use tasks::{spawn_cleanup_task, spawn_clock_task};

/// Main entry point for the prefix cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create cache store and stats engine with configured parameters
/// 4. Start the coarse clock and TTL cleanup background tasks
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prefix_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Prefix Cache Server");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, default_ttl={}s, port={}, cleanup_interval={}s, prefix_delimiter={:?}",
        config.max_entries,
        config.default_ttl,
        config.server_port,
        config.cleanup_interval,
        config.prefix_delimiter as char
    );

    // Create application state with cache store and stats engine
    let state = AppState::from_config(&config);
    info!("Cache store and prefix statistics initialized");

    // The stats engine reads time from this clock; without the task it
    // would stand still and every byte-second integral would be zero.
    let clock_handle = spawn_clock_task(state.clock.clone());
    let cleanup_handle = spawn_cleanup_task(state.cache.clone(), config.cleanup_interval);
    info!("Background tasks started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(clock_handle, cleanup_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the background tasks and allows graceful
/// shutdown.
async fn shutdown_signal(
    clock_handle: tokio::task::JoinHandle<()>,
    cleanup_handle: tokio::task::JoinHandle<()>,
) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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

    clock_handle.abort();
    cleanup_handle.abort();
    warn!("Background tasks aborted");
}
