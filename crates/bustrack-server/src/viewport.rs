//! Per-viewer viewport, owned by the listener and observed by the broadcaster.
//!
//! The listener activity is the only writer. It publishes each accepted
//! rectangle through a single-slot [`watch`] channel; the broadcaster reads
//! whatever is newest on every tick. Intermediate values that nobody read
//! are simply overwritten.

use bustrack_protocol::Bounds;
use tokio::sync::watch;

/// Create a viewport pair starting at the all-zero [`Bounds`].
pub fn channel() -> (ViewportWriter, ViewportReader) {
    let (tx, rx) = watch::channel(Bounds::default());
    (ViewportWriter { tx }, ViewportReader { rx })
}

/// Write half, held by the viewer's listener activity.
#[derive(Debug)]
pub struct ViewportWriter {
    tx: watch::Sender<Bounds>,
}

impl ViewportWriter {
    /// Replace the current viewport. Never blocks, never fails.
    pub fn update(&self, bounds: Bounds) {
        self.tx.send_replace(bounds);
    }
}

/// Read half, held by the viewer's periodic broadcaster.
#[derive(Debug, Clone)]
pub struct ViewportReader {
    rx: watch::Receiver<Bounds>,
}

impl ViewportReader {
    /// The newest rectangle published by the writer.
    pub fn current(&self) -> Bounds {
        *self.rx.borrow()
    }
}
