//! Completion signal for the host page handshake.
//!
//! [`load_signal`] returns a clonable [`HandshakeHandle`] (the resolve/reject
//! controls) and a [`LoadWaiter`] the frame awaits. The first resolve or
//! reject wins; later calls are ignored. There is no timeout: if the handshake
//! never arrives the waiter stays pending, and it only fails once every handle
//! has been dropped.

use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

type Outcome = Result<(), String>;

/// Resolve/reject controls for a pending handshake.
#[derive(Clone)]
pub struct HandshakeHandle {
    tx: Arc<Mutex<Option<oneshot::Sender<Outcome>>>>,
}

/// Awaitable side of the handshake.
#[derive(Debug)]
pub struct LoadWaiter {
    rx: oneshot::Receiver<Outcome>,
}

/// How a handshake wait ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// The host page confirmed the connection.
    Connected,
    /// The host page (or local code) rejected the handshake.
    Rejected(String),
    /// Every handle was dropped without resolving.
    Abandoned,
}

/// Create a linked handle/waiter pair.
pub fn load_signal() -> (HandshakeHandle, LoadWaiter) {
    let (tx, rx) = oneshot::channel();
    (
        HandshakeHandle {
            tx: Arc::new(Mutex::new(Some(tx))),
        },
        LoadWaiter { rx },
    )
}

impl HandshakeHandle {
    /// Mark the handshake complete. Returns `false` if already settled.
    pub fn resolve(&self) -> bool {
        self.settle(Ok(()))
    }

    /// Fail the handshake with `reason`. Returns `false` if already settled.
    pub fn reject(&self, reason: impl Into<String>) -> bool {
        self.settle(Err(reason.into()))
    }

    /// Whether resolve or reject has already been called.
    pub fn is_settled(&self) -> bool {
        self.lock().is_none()
    }

    fn settle(&self, outcome: Outcome) -> bool {
        match self.lock().take() {
            // The waiter may have been dropped; settling still counts
            Some(tx) => {
                let _ = tx.send(outcome);
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<oneshot::Sender<Outcome>>> {
        self.tx
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for HandshakeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandshakeHandle")
            .field("settled", &self.is_settled())
            .finish()
    }
}

impl LoadWaiter {
    /// Wait for the handshake to settle.
    pub async fn wait(self) -> HandshakeOutcome {
        match self.rx.await {
            Ok(Ok(())) => HandshakeOutcome::Connected,
            Ok(Err(reason)) => HandshakeOutcome::Rejected(reason),
            Err(_) => HandshakeOutcome::Abandoned,
        }
    }
}
