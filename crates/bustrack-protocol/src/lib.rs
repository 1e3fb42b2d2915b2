//! Wire types and message validation for the bus tracker.
//!
//! This crate is the single source of truth for everything that crosses a
//! socket between producers, the broker, and map viewers.
//!
//! # Modules
//!
//! - [`geo`] -- [`Position`] records and the [`Bounds`] viewport rectangle
//! - [`message`] -- Envelope types for every JSON frame on the wire
//! - [`validate`] -- Two-stage envelope validation and typed payload decoding
//! - [`error`] -- Protocol error kinds and the fixed error envelope
//!
//! # Wire formats
//!
//! ```text
//! producer -> broker  {"msgType": "Buses", "buses": {"busId": .., "lat": .., "lng": .., "route": ..}}
//! broker -> viewer    {"msgType": "Buses", "buses": [{..}, ..]}
//! viewer -> broker    {"msgType": "newBounds", "data": {"east_lng": .., "north_lat": .., ..}}
//! broker -> either    {"errors": ["<message>"], "msgType": "Errors"}
//! ```

pub mod error;
pub mod geo;
pub mod message;
pub mod validate;

// Re-export all public types at crate root for convenience.
pub use error::{ErrorKind, ValidationError};
pub use geo::{Bounds, Position};
pub use message::{BusesBroadcast, Envelope, MessageKind, Payload, PositionUpdate};
pub use validate::{bounds_from_data, position_from_payload, validate};
