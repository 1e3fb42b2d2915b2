//! Command-line and environment configuration for the producer.

use std::time::Duration;

use bustrack_producer::ReconnectPolicy;
use clap::Parser;

/// Publish bus positions read from stdin to a broker.
#[derive(Debug, Clone, Parser)]
#[command(name = "bustrack-producer")]
#[command(about = "Reads newline-delimited bus positions from stdin and publishes them to the broker")]
#[command(version)]
pub struct ProducerArgs {
    /// Broker ingestion URL
    #[arg(short = 's', long, env = "SERVER_URL", default_value = "ws://127.0.0.1:8080")]
    pub server: String,

    /// Milliseconds to wait before reconnecting after a failure
    #[arg(short = 'r', long, env = "RECONNECT_DELAY_MS", default_value_t = 3000)]
    pub reconnect_delay_ms: u64,

    /// Positions buffered while the broker is unreachable
    #[arg(long, env = "PRODUCER_BUFFER", default_value_t = 1024)]
    pub buffer: usize,

    /// Log filter used when `RUST_LOG` is not set
    #[arg(short = 'v', long = "log", env = "LOGGING", default_value = "info")]
    pub log: String,
}

impl ProducerArgs {
    /// Reconnect policy built from the configured delay.
    pub const fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy::new(Duration::from_millis(self.reconnect_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn flags_parse() {
        let args = ProducerArgs::try_parse_from([
            "bustrack-producer",
            "--server",
            "ws://broker:9000",
            "--reconnect-delay-ms",
            "500",
        ])
        .unwrap();
        assert_eq!(args.server, "ws://broker:9000");
        assert_eq!(args.reconnect_policy().delay, Duration::from_millis(500));
    }
}
