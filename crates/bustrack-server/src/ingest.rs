//! `WebSocket` handler for vehicle position producers.
//!
//! Producers connect to the ingestion port and stream one
//! `{"msgType": "Buses", "buses": {...}}` frame per position update. Each
//! valid frame overwrites the vehicle's entry in the [`PositionRegistry`].
//!
//! A frame that fails validation is answered with the error envelope on the
//! same socket and the session keeps listening. Only the transport going
//! away ends the session; reconnecting is the producer's job.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use bustrack_protocol::{Envelope, ValidationError, position_from_payload, validate};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::registry::PositionRegistry;
use crate::state::AppState;

/// What happened to a producer frame that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The position for this vehicle id was stored.
    Stored(String),
    /// A well-formed frame that means nothing on this endpoint.
    Ignored,
}

/// Upgrade an HTTP request to a producer `WebSocket` session.
///
/// # Route
///
/// `GET /` on the ingestion port
pub async fn ws_ingest(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_producer(socket, state))
}

/// Validate one producer text frame and apply it to the registry.
///
/// `newBounds` frames are well-formed but have no meaning here and are
/// reported as [`IngestOutcome::Ignored`].
///
/// # Errors
///
/// Returns the [`ValidationError`] to send back to the producer.
pub async fn ingest_frame(
    registry: &PositionRegistry,
    text: &str,
) -> Result<IngestOutcome, ValidationError> {
    match validate(text)? {
        Envelope::Buses(payload) => {
            let position = position_from_payload(payload)?;
            let bus_id = position.bus_id.clone();
            registry.upsert(position).await;
            Ok(IngestOutcome::Stored(bus_id))
        }
        Envelope::NewBounds(_) => Ok(IngestOutcome::Ignored),
    }
}

async fn handle_producer(socket: WebSocket, state: Arc<AppState>) {
    let span = info_span!("producer", connection_id = %Uuid::new_v4());
    receive_positions(socket, &state.registry)
        .instrument(span)
        .await;
}

/// Session loop: `Receiving` until the socket closes or fails.
async fn receive_positions(mut socket: WebSocket, registry: &PositionRegistry) {
    info!("producer connected");

    while let Some(msg) = socket.recv().await {
        match msg {
            Ok(Message::Text(text)) => match ingest_frame(registry, text.as_str()).await {
                Ok(IngestOutcome::Stored(bus_id)) => {
                    debug!(%bus_id, "position stored");
                }
                Ok(IngestOutcome::Ignored) => {
                    debug!("ignoring newBounds frame on ingestion endpoint");
                }
                Err(e) => {
                    warn!(error = %e, "rejected producer frame");
                    if socket.send(Message::Text(e.envelope().into())).await.is_err() {
                        debug!("producer disconnected (error reply failed)");
                        return;
                    }
                }
            },
            Ok(Message::Close(_)) => break,
            Err(e) => {
                debug!("producer WebSocket error: {e}");
                return;
            }
            _ => {
                // Ping, pong and binary frames carry no positions.
            }
        }
    }

    info!("producer disconnected");
}
