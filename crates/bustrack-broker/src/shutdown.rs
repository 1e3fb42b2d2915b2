//! Termination signal handling.
//!
//! **Unix:** `SIGINT`, `SIGTERM`, `SIGQUIT`. **Elsewhere:** `Ctrl-C`.

/// Wait until the process is asked to terminate.
///
/// Returns `Err` if a signal handler cannot be registered.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Wait until the process is asked to terminate.
///
/// Returns `Err` if the handler cannot be registered.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
