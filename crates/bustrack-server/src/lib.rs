//! Real-time, viewport-filtered position broker for the bus tracker.
//!
//! This crate provides two Axum `WebSocket` endpoints on separate ports:
//!
//! - **Ingestion** (`bus_port`) -- producers push one position per frame;
//!   every valid update overwrites that vehicle's entry in the shared
//!   [`PositionRegistry`]
//! - **Viewer** (`browser_port`) -- each map client reports the rectangle it
//!   is looking at and receives, on every refresh tick and right after every
//!   rectangle change, the positions inside it
//!
//! # Architecture
//!
//! ```text
//! producers --> ingest session --> PositionRegistry --> viewer broadcaster --> viewers
//!                                                   ^
//!                          viewer listener --(watch: Bounds)
//! ```
//!
//! The two flows meet only at the registry. Each viewer's rectangle is
//! owned by that viewer's listener and handed to its broadcaster through a
//! latest-value-wins channel, so no viewport state is shared between
//! connections. Protocol errors are answered on the socket with the fixed
//! error envelope and never close a connection.

pub mod error;
pub mod ingest;
pub mod registry;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod viewer;
pub mod viewport;

// Re-export primary types for convenience.
pub use error::{ServerError, StartupError};
pub use registry::PositionRegistry;
pub use router::{build_ingest_router, build_viewer_router};
pub use server::{BoundServer, ServerConfig};
pub use startup::{RunningServer, spawn_server};
pub use state::AppState;
