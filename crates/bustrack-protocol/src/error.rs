//! Protocol-level error kinds and the error envelope sent back to clients.
//!
//! Every error here is recoverable: the session that produced it replies
//! with [`ValidationError::envelope`] and keeps listening.

/// Message type marker carried by every error envelope.
pub const ERRORS_MSG_TYPE: &str = "Errors";

/// Why an inbound frame was rejected.
///
/// The `Display` text is the exact human-readable string that goes on the
/// wire, so changing it is a protocol change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// The frame is not a well-formed JSON object.
    #[error("Requires valid JSON")]
    InvalidPayload,

    /// The frame has no recognized `msgType`.
    #[error("Requires msgType specified")]
    MissingMessageType,

    /// A `newBounds` frame without a usable `data` object.
    #[error("Requires data specified")]
    MissingBoundsData,

    /// A `Buses` frame whose `buses` object is not a single position.
    #[error("Requires busId, lat, lng and route specified")]
    InvalidPosition,

    /// A `newBounds` frame with south above north or west east of east.
    #[error("Requires south_lat <= north_lat and west_lng <= east_lng")]
    InvertedBounds,
}

/// A rejected frame, tagged with the `"Errors"` message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct ValidationError {
    kind: ErrorKind,
}

impl ValidationError {
    pub(crate) const fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// The specific reason for rejection.
    pub const fn kind(self) -> ErrorKind {
        self.kind
    }

    /// The message type marker, always `"Errors"`.
    pub const fn message_type(self) -> &'static str {
        ERRORS_MSG_TYPE
    }

    /// Serialize to the fixed wire shape.
    ///
    /// Always a single-element list, spaced exactly as
    /// `{"errors": ["<message>"], "msgType": "Errors"}`.
    pub fn envelope(self) -> String {
        // Encoding a plain string cannot fail.
        let message = serde_json::to_string(&self.kind.to_string())
            .unwrap_or_else(|_| String::from("\"\""));
        format!(
            "{{\"errors\": [{message}], \"msgType\": \"{}\"}}",
            self.message_type()
        )
    }
}

impl From<ErrorKind> for ValidationError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}
