//! Broker startup helper for running on a background Tokio task.
//!
//! Provides [`spawn_server`] which binds both endpoints eagerly and then
//! serves them on a spawned task. The broker binary and the integration
//! tests use this so the accept loops run beside whatever else the caller
//! is doing.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bustrack_server::{AppState, ServerConfig, spawn_server};
//! use std::sync::Arc;
//!
//! let running = spawn_server(&ServerConfig::default(), Arc::new(AppState::default())).await?;
//! println!("viewers connect to {}", running.viewer_addr);
//! running.shutdown().await?;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::{ServerError, StartupError};
use crate::server::{BoundServer, ServerConfig};
use crate::state::AppState;

/// A broker serving on a background task.
///
/// Dropping this value without calling [`RunningServer::shutdown`] also
/// stops the accept loops, since the shutdown sender goes away with it.
#[derive(Debug)]
pub struct RunningServer {
    /// Where producers connect.
    pub ingest_addr: SocketAddr,
    /// Where viewers connect.
    pub viewer_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl RunningServer {
    /// Stop accepting connections and wait for the accept loops to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if serving failed or the task did not finish
    /// cleanly.
    pub async fn shutdown(self) -> Result<(), StartupError> {
        // The receiver is gone only if the server already exited.
        let _ = self.shutdown.send(());
        self.handle
            .await
            .map_err(|e| StartupError::Join(e.to_string()))??;
        Ok(())
    }
}

/// Bind the broker and serve it on a background Tokio task.
///
/// Binding happens before the task is spawned, so address-in-use and
/// invalid configuration are reported to the caller directly.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the configuration is invalid or
/// either endpoint cannot bind.
pub async fn spawn_server(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<RunningServer, StartupError> {
    let bound = BoundServer::bind(config, state).await?;
    let ingest_addr = bound.ingest_addr()?;
    let viewer_addr = bound.viewer_addr()?;

    let (shutdown, stop) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let result = bound
            .serve(async move {
                let _ = stop.await;
            })
            .await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "broker exited with error");
        }
        result
    });

    tracing::info!(%ingest_addr, %viewer_addr, "broker spawned on background task");

    Ok(RunningServer {
        ingest_addr,
        viewer_addr,
        shutdown,
        handle,
    })
}
