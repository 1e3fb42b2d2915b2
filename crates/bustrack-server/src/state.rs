//! Shared application state for both broker endpoints.

use std::time::Duration;

use crate::registry::PositionRegistry;

/// Default period between unsolicited snapshots sent to each viewer.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Shared state for the Axum applications.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor into both the ingestion and the viewer router. The registry
/// handle is the only thing the two data flows have in common.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Latest known position per vehicle.
    pub registry: PositionRegistry,
    /// How often each viewer receives a snapshot without asking.
    pub refresh_interval: Duration,
}

impl AppState {
    /// Create state with an empty registry.
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            registry: PositionRegistry::new(),
            refresh_interval,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}
