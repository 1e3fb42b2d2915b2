//! Axum router construction for the two broker endpoints.
//!
//! Producers and viewers are served on separate ports, so each gets its own
//! [`Router`]. Both accept the `WebSocket` upgrade on `/` and share one
//! [`AppState`].

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{ingest, viewer};

/// Build the router for the producer (ingestion) port.
///
/// - `GET /` -- producer `WebSocket` session
pub fn build_ingest_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(ingest::ws_ingest))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the router for the viewer port.
///
/// - `GET /` -- viewer `WebSocket` session
pub fn build_viewer_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(viewer::ws_viewer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
