//! Command-line and environment configuration for the broker.
//!
//! Every flag falls back to an environment variable, and a `.env` file in
//! the working directory is loaded into the environment before parsing.
//! The parsed values are turned into a plain [`ServerConfig`] once and
//! handed to the server library.

use std::time::Duration;

use bustrack_server::ServerConfig;
use clap::Parser;

/// Real-time bus position broker.
#[derive(Debug, Clone, Parser)]
#[command(name = "bustrack-broker")]
#[command(about = "Receives bus positions from producers and streams them to map viewers")]
#[command(version)]
pub struct BrokerArgs {
    /// Host address both endpoints bind to
    #[arg(short = 's', long, env = "SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port producers connect to
    #[arg(short = 'b', long, env = "BUS_PORT", default_value_t = 8080)]
    pub bus_port: u16,

    /// Port map viewers connect to
    #[arg(short = 'w', long, env = "BROWSER_PORT", default_value_t = 8000)]
    pub browser_port: u16,

    /// Milliseconds between snapshots pushed to each viewer
    #[arg(short = 'r', long, env = "BUSES_REFRESH_INTERVAL_MS", default_value_t = 1000)]
    pub refresh_interval_ms: u64,

    /// Log filter used when `RUST_LOG` is not set (e.g. `info`, `bustrack_server=debug`)
    #[arg(short = 'v', long = "log", env = "LOGGING", default_value = "info")]
    pub log: String,
}

impl BrokerArgs {
    /// The server library's view of this configuration.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            bus_port: self.bus_port,
            browser_port: self.browser_port,
            refresh_interval: Duration::from_millis(self.refresh_interval_ms),
        }
    }
}
