//! Broker binary for the bus tracker.
//!
//! Wires configuration, logging and the two `WebSocket` endpoints
//! together, then runs until the process receives a termination signal.
//!
//! # Startup Sequence
//!
//! 1. Load `.env` (if present) and parse flags / environment
//! 2. Initialize structured logging (tracing)
//! 3. Bind the producer and viewer endpoints
//! 4. Serve until `SIGINT` / `SIGTERM` / `SIGQUIT`
//! 5. Stop accepting connections and exit

mod config;
mod error;
mod shutdown;

use std::sync::Arc;

use bustrack_server::{AppState, spawn_server};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::BrokerArgs;
use crate::error::BrokerError;

/// Application entry point for the broker.
///
/// # Errors
///
/// Returns an error if the endpoints cannot be bound or signal handlers
/// cannot be installed.
#[tokio::main]
async fn main() -> Result<(), BrokerError> {
    // 1. Configuration. A missing .env file is normal.
    let _ = dotenvy::dotenv();
    let args = BrokerArgs::parse();

    // 2. Structured logging; RUST_LOG wins over --log.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log)),
        )
        .with_target(true)
        .init();

    info!("bustrack-broker starting");

    let config = args.server_config();
    info!(
        host = %config.host,
        bus_port = config.bus_port,
        browser_port = config.browser_port,
        refresh_interval_ms = args.refresh_interval_ms,
        "Configuration loaded"
    );

    // 3. Bind and serve in the background.
    let state = Arc::new(AppState::new(config.refresh_interval));
    let running = spawn_server(&config, state).await?;
    info!(
        ingest_addr = %running.ingest_addr,
        viewer_addr = %running.viewer_addr,
        "Broker running"
    );

    // 4. Wait for termination.
    shutdown::wait_for_shutdown_signal().await?;
    info!("Termination signal received");

    // 5. Stop accepting connections.
    running.shutdown().await?;
    info!("bustrack-broker stopped");

    Ok(())
}
