//! Error types for the broker server.
//!
//! Protocol problems inside a session never surface here; they are answered
//! on the socket with an error envelope. These errors are about the process:
//! configuration, binding, and serving.

/// Errors that can occur when starting or running the broker.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The configuration cannot be served as given.
    #[error("config error: {0}")]
    Config(String),

    /// Failed to bind to a network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// A server loop hit a fatal I/O error.
    #[error("serve error: {0}")]
    Serve(String),
}

/// Errors that can occur when spawning or stopping a background broker.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),

    /// The background task panicked or was cancelled.
    #[error("server task failed: {0}")]
    Join(String),
}
