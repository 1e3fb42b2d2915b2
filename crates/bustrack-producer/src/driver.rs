//! Resilient session driver: reconnect with a fixed delay, forever.
//!
//! [`run_with_reconnect`] runs a [`Session`] until it finishes cleanly. A
//! transport failure (connect, handshake, disconnect) is logged, followed
//! by a fixed pause, and the session is started again. There is no backoff
//! growth, no jitter, and no attempt limit; the fleet is small and the
//! broker is expected back.
//!
//! # Example
//! ```rust,ignore
//! use std::time::Duration;
//! use bustrack_producer::{ReconnectPolicy, run_with_reconnect};
//!
//! let policy = ReconnectPolicy::new(Duration::from_secs(3));
//! run_with_reconnect(policy, &mut client).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use tracing::{error, info};

use crate::error::ProducerError;

/// Delay used when none is configured.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// How long to wait between connection attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Fixed pause after every failed attempt.
    pub delay: Duration,
}

impl ReconnectPolicy {
    /// Policy with the given fixed delay.
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RECONNECT_DELAY)
    }
}

/// One connect-and-talk cycle that the driver can restart.
///
/// `run` should connect, do its work, and return `Ok(())` only when there
/// is nothing more to do. Returning a transport error asks for a retry.
pub trait Session {
    /// Run one connection's worth of work.
    fn run(&mut self) -> impl Future<Output = Result<(), ProducerError>> + Send;
}

/// Run `session` until it completes, reconnecting after transport errors.
///
/// # Errors
///
/// Returns the first non-transport error the session reports.
pub async fn run_with_reconnect<S: Session>(
    policy: ReconnectPolicy,
    session: &mut S,
) -> Result<(), ProducerError> {
    let mut attempt: u64 = 0;
    loop {
        attempt = attempt.saturating_add(1);
        match session.run().await {
            Ok(()) => {
                info!(attempt, "session finished");
                return Ok(());
            }
            Err(e) if e.is_transport() => {
                error!(
                    attempt,
                    error = %e,
                    delay_ms = policy.delay.as_millis(),
                    "session failed, reconnecting"
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
