//! Broker lifecycle: bind both endpoints, then serve until told to stop.
//!
//! Binding and serving are split so callers (and tests) can bind to port
//! `0` and learn the real addresses before any client connects.

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::error::ServerError;
use crate::router::{build_ingest_router, build_viewer_router};
use crate::state::{AppState, DEFAULT_REFRESH_INTERVAL};

/// Configuration for the broker endpoints.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind both endpoints to (e.g. `127.0.0.1`).
    pub host: String,
    /// TCP port for producer connections.
    pub bus_port: u16,
    /// TCP port for viewer connections.
    pub browser_port: u16,
    /// Period between unsolicited viewer snapshots.
    pub refresh_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            bus_port: 8080,
            browser_port: 8000,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

impl ServerConfig {
    /// Reject configurations that cannot be served.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if the refresh interval is zero or
    /// both endpoints ask for the same non-ephemeral port.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.refresh_interval.is_zero() {
            return Err(ServerError::Config(String::from(
                "refresh interval must be greater than zero",
            )));
        }
        if self.bus_port != 0 && self.bus_port == self.browser_port {
            return Err(ServerError::Config(format!(
                "bus and browser ports must differ (both {})",
                self.bus_port
            )));
        }
        Ok(())
    }

    fn addr(&self, port: u16) -> Result<SocketAddr, ServerError> {
        format!("{}:{port}", self.host)
            .parse()
            .map_err(|e| ServerError::Bind(format!("invalid address {}:{port}: {e}", self.host)))
    }
}

/// Both endpoints bound, not yet accepting connections.
#[derive(Debug)]
pub struct BoundServer {
    ingest: TcpListener,
    viewer: TcpListener,
    state: Arc<AppState>,
}

impl BoundServer {
    /// Validate `config` and bind both listeners.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or either port
    /// cannot be bound.
    pub async fn bind(config: &ServerConfig, state: Arc<AppState>) -> Result<Self, ServerError> {
        config.validate()?;
        let ingest = bind_listener(config.addr(config.bus_port)?).await?;
        let viewer = bind_listener(config.addr(config.browser_port)?).await?;
        Ok(Self {
            ingest,
            viewer,
            state,
        })
    }

    /// Address producers connect to.
    pub fn ingest_addr(&self) -> Result<SocketAddr, ServerError> {
        local_addr(&self.ingest)
    }

    /// Address viewers connect to.
    pub fn viewer_addr(&self) -> Result<SocketAddr, ServerError> {
        local_addr(&self.viewer)
    }

    /// Serve both endpoints until `shutdown` completes.
    ///
    /// Open sessions are not waited for; they end with their sockets.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Serve`] if either accept loop fails.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let ingest_addr = self.ingest_addr()?;
        let viewer_addr = self.viewer_addr()?;
        let (stop_tx, stop_rx) = watch::channel(false);

        let ingest = axum::serve(self.ingest, build_ingest_router(Arc::clone(&self.state)))
            .with_graceful_shutdown(stopped(stop_rx.clone()))
            .into_future();
        let viewer = axum::serve(self.viewer, build_viewer_router(self.state))
            .with_graceful_shutdown(stopped(stop_rx))
            .into_future();
        let trigger = async move {
            shutdown.await;
            stop_tx.send_replace(true);
            info!("shutdown requested");
            Ok::<(), std::io::Error>(())
        };

        info!(%ingest_addr, %viewer_addr, "broker listening");

        tokio::try_join!(trigger, ingest, viewer)
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        info!("broker stopped");
        Ok(())
    }
}

async fn bind_listener(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))
}

fn local_addr(listener: &TcpListener) -> Result<SocketAddr, ServerError> {
    listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))
}

async fn stopped(mut rx: watch::Receiver<bool>) {
    // A dropped sender also means stop.
    let _ = rx.wait_for(|stop| *stop).await;
}
