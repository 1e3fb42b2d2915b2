//! `WebSocket` producer client for the broker's ingestion endpoint.
//!
//! [`ProducerClient`] drains an `mpsc` channel of [`Position`]s and sends
//! each one as a `{"msgType": "Buses", "buses": {...}}` frame. Error
//! envelopes sent back by the broker are logged; they never stop the
//! client. A dropped connection is reported as a transport error so the
//! reconnect driver can start a new one. The channel outlives connections,
//! so nothing queued is lost across a reconnect, and a frame that failed to
//! send is retried first on the next connection.

use std::future::Future;

use bustrack_protocol::{Position, PositionUpdate};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::driver::{ReconnectPolicy, Session, run_with_reconnect};
use crate::error::ProducerError;

type BrokerSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Publishes positions from a channel to one broker URL.
#[derive(Debug)]
pub struct ProducerClient {
    url: String,
    positions: mpsc::Receiver<Position>,
    pending: Option<String>,
}

impl ProducerClient {
    /// Client that reads positions from `positions` and sends them to `url`
    /// (e.g. `ws://127.0.0.1:8080`).
    pub fn new(url: impl Into<String>, positions: mpsc::Receiver<Position>) -> Self {
        Self {
            url: url.into(),
            positions,
            pending: None,
        }
    }

    /// Client plus the sender side of a new channel with `capacity` slots.
    pub fn channel(url: impl Into<String>, capacity: usize) -> (mpsc::Sender<Position>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(url, rx))
    }

    /// The broker URL this client connects to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Publish until every sender is dropped, reconnecting as needed.
    ///
    /// # Errors
    ///
    /// Returns the first error that reconnecting cannot fix.
    pub async fn publish(mut self, policy: ReconnectPolicy) -> Result<(), ProducerError> {
        run_with_reconnect(policy, &mut self).await
    }

    async fn connect_and_forward(&mut self) -> Result<(), ProducerError> {
        let (ws, _) = connect_async(self.url.as_str()).await.map_err(|e| match e {
            WsError::Url(_) | WsError::HttpFormat(_) => {
                ProducerError::InvalidUrl(format!("{}: {e}", self.url))
            }
            other => ProducerError::Connect(format!("{}: {other}", self.url)),
        })?;
        info!(url = %self.url, "connected to broker");

        let (mut sink, mut stream) = ws.split();

        if let Some(frame) = self.pending.take() {
            self.send_frame(&mut sink, frame).await?;
        }

        loop {
            tokio::select! {
                next = self.positions.recv() => match next {
                    Some(position) => {
                        let frame = PositionUpdate::new(position).to_json()?;
                        self.send_frame(&mut sink, frame).await?;
                    }
                    None => {
                        info!("position source exhausted, closing connection");
                        // Best effort; the broker copes with an abrupt close.
                        let _ = sink.close().await;
                        return Ok(());
                    }
                },
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        warn!(reply = text.as_str(), "broker rejected a frame");
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return Err(ProducerError::Closed(String::from("broker closed the connection")));
                    }
                    Some(Err(e)) => return Err(ProducerError::Closed(e.to_string())),
                    Some(Ok(_)) => {}
                },
            }
        }
    }

    async fn send_frame(&mut self, sink: &mut BrokerSink, frame: String) -> Result<(), ProducerError> {
        match sink.send(Message::text(frame.clone())).await {
            Ok(()) => {
                debug!(%frame, "position sent");
                Ok(())
            }
            Err(e) => {
                self.pending = Some(frame);
                Err(ProducerError::Send(e.to_string()))
            }
        }
    }
}

impl Session for ProducerClient {
    fn run(&mut self) -> impl Future<Output = Result<(), ProducerError>> + Send {
        self.connect_and_forward()
    }
}
