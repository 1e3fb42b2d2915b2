//! Producer binary for the bus tracker.
//!
//! Reads one position per line from stdin and publishes each to the
//! broker's ingestion endpoint, reconnecting with a fixed delay whenever
//! the broker is unreachable. Exits when stdin closes and every queued
//! position has been sent.

mod config;

use anyhow::Context;
use bustrack_producer::{ProducerClient, parse_position_line};
use bustrack_protocol::Position;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ProducerArgs;

/// Application entry point for the producer.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or publishing fails for a
/// reason reconnecting cannot fix.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = ProducerArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log)),
        )
        .with_target(true)
        .init();

    info!(
        server = %args.server,
        reconnect_delay_ms = args.reconnect_delay_ms,
        "bustrack-producer starting"
    );

    // Reject a bad URL before reading stdin.
    args.server
        .as_str()
        .into_client_request()
        .with_context(|| format!("invalid --server url {}", args.server))?;

    let (tx, client) = ProducerClient::channel(args.server.clone(), args.buffer.max(1));
    let reader = tokio::spawn(read_positions(tx));

    client
        .publish(args.reconnect_policy())
        .await
        .context("publishing positions")?;
    reader.await.context("stdin reader task")??;

    info!("bustrack-producer finished");
    Ok(())
}

/// Feed stdin lines into the client's channel until EOF.
async fn read_positions(tx: mpsc::Sender<Position>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_number: u64 = 0;

    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        line_number = line_number.saturating_add(1);
        match parse_position_line(&line) {
            Ok(Some(position)) => {
                if tx.send(position).await.is_err() {
                    // The client stopped; nothing left to feed.
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => warn!(line_number, error = %e, "skipping malformed position line"),
        }
    }

    Ok(())
}
