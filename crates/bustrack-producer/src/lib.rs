//! Reconnecting position producer for the bus tracker broker.
//!
//! - [`driver`] -- fixed-delay reconnect loop around any [`Session`]
//! - [`client`] -- [`ProducerClient`], which forwards positions from a
//!   channel to the broker's ingestion endpoint
//! - [`input`] -- line parser used by the `bustrack-producer` binary
//!
//! # Architecture
//!
//! ```text
//! position source --mpsc--> ProducerClient --WebSocket--> broker (ingestion port)
//!                                 ^
//!                 run_with_reconnect (fixed delay)
//! ```

pub mod client;
pub mod driver;
pub mod error;
pub mod input;

pub use client::ProducerClient;
pub use driver::{DEFAULT_RECONNECT_DELAY, ReconnectPolicy, Session, run_with_reconnect};
pub use error::ProducerError;
pub use input::parse_position_line;
