//! `WebSocket` handler for map viewers.
//!
//! Each viewer connection runs two activities that share one viewport:
//!
//! - the **listener** reads `newBounds` frames, publishes the new
//!   rectangle, and answers right away with a fresh snapshot;
//! - the **broadcaster** sends a snapshot on every refresh tick whether or
//!   not the rectangle changed.
//!
//! Both write through the same socket half behind an async mutex. They run
//! under one `select!`, so whichever ends first (usually because the
//! socket closed) drops the other. Nothing outlives the connection.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use bustrack_protocol::{
    Bounds, BusesBroadcast, Envelope, ValidationError, bounds_from_data, validate,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::Mutex;
use tokio::time::{self, MissedTickBehavior};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::registry::PositionRegistry;
use crate::state::AppState;
use crate::viewport::{self, ViewportReader, ViewportWriter};

/// Lower bound on the refresh period; `tokio::time::interval` rejects zero.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(10);

type ViewerSink = SplitSink<WebSocket, Message>;

/// Upgrade an HTTP request to a viewer `WebSocket` session.
///
/// # Route
///
/// `GET /` on the viewer port
pub async fn ws_viewer(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_viewer(socket, state))
}

/// Validate one viewer text frame.
///
/// Returns `Ok(Some(bounds))` for an accepted `newBounds` frame and
/// `Ok(None)` for a well-formed `Buses` frame, which viewers have no
/// business sending and which is ignored.
///
/// # Errors
///
/// Returns the [`ValidationError`] to send back to the viewer.
pub fn bounds_from_frame(text: &str) -> Result<Option<Bounds>, ValidationError> {
    match validate(text)? {
        Envelope::NewBounds(data) => bounds_from_data(data).map(Some),
        Envelope::Buses(_) => Ok(None),
    }
}

/// Build the snapshot frame for `bounds`.
///
/// # Errors
///
/// Returns an error if the broadcast cannot be serialized.
pub async fn snapshot_frame(
    registry: &PositionRegistry,
    bounds: &Bounds,
) -> Result<String, serde_json::Error> {
    let buses = registry.within(bounds).await;
    debug!(count = buses.len(), "buses inside bounds");
    BusesBroadcast::new(buses).to_json()
}

async fn handle_viewer(socket: WebSocket, state: Arc<AppState>) {
    let span = info_span!("viewer", connection_id = %Uuid::new_v4());
    run_viewer(socket, state).instrument(span).await;
}

async fn run_viewer(socket: WebSocket, state: Arc<AppState>) {
    info!("viewer connected");

    let (sink, stream) = socket.split();
    let sink = Mutex::new(sink);
    let (writer, reader) = viewport::channel();

    tokio::select! {
        () = listen(stream, &sink, writer, &state.registry) => {
            debug!("viewer listener finished");
        }
        () = broadcast_periodically(&sink, reader, &state.registry, state.refresh_interval) => {
            debug!("viewer broadcaster finished");
        }
    }

    info!("viewer disconnected");
}

/// Listener activity: sole owner of the viewport's write half.
async fn listen(
    mut stream: SplitStream<WebSocket>,
    sink: &Mutex<ViewerSink>,
    viewport: ViewportWriter,
    registry: &PositionRegistry,
) {
    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(text)) if text.as_str().is_empty() => {
                debug!("skipping empty viewer frame");
            }
            Ok(Message::Text(text)) => {
                let sent = match bounds_from_frame(text.as_str()) {
                    Ok(Some(bounds)) => {
                        viewport.update(bounds);
                        debug!(?bounds, "viewport updated");
                        send_snapshot(sink, registry, &bounds).await
                    }
                    Ok(None) => {
                        debug!("ignoring Buses frame from viewer");
                        Ok(())
                    }
                    Err(e) => {
                        warn!(error = %e, "rejected viewer frame");
                        send_text(sink, e.envelope()).await
                    }
                };
                if let Err(e) = sent {
                    debug!("viewer disconnected (send failed): {e}");
                    return;
                }
            }
            Ok(Message::Close(_)) => return,
            Err(e) => {
                debug!("viewer WebSocket error: {e}");
                return;
            }
            _ => {
                // Ping, pong and binary frames are not part of the protocol.
            }
        }
    }
}

/// Broadcaster activity: one snapshot per tick, first one immediately.
async fn broadcast_periodically(
    sink: &Mutex<ViewerSink>,
    viewport: ViewportReader,
    registry: &PositionRegistry,
    period: Duration,
) {
    let mut ticker = time::interval(period.max(MIN_REFRESH_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let bounds = viewport.current();
        if let Err(e) = send_snapshot(sink, registry, &bounds).await {
            debug!("viewer disconnected (periodic send failed): {e}");
            return;
        }
    }
}

/// Send one filtered snapshot.
///
/// A snapshot that fails to serialize is logged and skipped; only a
/// transport failure is returned.
async fn send_snapshot(
    sink: &Mutex<ViewerSink>,
    registry: &PositionRegistry,
    bounds: &Bounds,
) -> Result<(), axum::Error> {
    match snapshot_frame(registry, bounds).await {
        Ok(frame) => send_text(sink, frame).await,
        Err(e) => {
            warn!("Failed to serialize buses snapshot: {e}");
            Ok(())
        }
    }
}

async fn send_text(sink: &Mutex<ViewerSink>, text: String) -> Result<(), axum::Error> {
    sink.lock().await.send(Message::Text(text.into())).await
}
