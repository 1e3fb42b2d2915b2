//! Error types for the broker binary.
//!
//! [`BrokerError`] is the top-level error type that wraps all possible
//! failure modes during startup and shutdown.

/// Top-level error for the broker binary.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    /// The broker could not be started or stopped cleanly.
    #[error("startup error: {source}")]
    Startup {
        /// The underlying startup error.
        #[from]
        source: bustrack_server::StartupError,
    },

    /// OS signal handlers could not be installed.
    #[error("signal error: {source}")]
    Signal {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
