//! Error types for the producer side.
//!
//! Transport failures are retried by the reconnect driver; everything else
//! ends the producer.

/// Errors that can occur while publishing positions.
#[derive(Debug, thiserror::Error)]
pub enum ProducerError {
    /// The broker URL cannot be used to open a connection.
    #[error("invalid broker url: {0}")]
    InvalidUrl(String),

    /// TCP connect or `WebSocket` handshake failed.
    #[error("connect error: {0}")]
    Connect(String),

    /// The broker closed the connection or the stream failed.
    #[error("connection closed: {0}")]
    Closed(String),

    /// A frame could not be written to the socket.
    #[error("send error: {0}")]
    Send(String),

    /// A position could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProducerError {
    /// Whether reconnecting could fix this.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Closed(_) | Self::Send(_))
    }
}
