//! In-process [`FrameMessenger`].
//!
//! [`LocalMessenger::pair`] returns the frame side and a [`HostPort`] the
//! host side uses to talk to it. Messages flow over a tokio mpsc queue; a
//! listener task spawned by `establish` settles the handshake and forwards
//! data messages to the frame's inbox.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use super::{FrameMessenger, HandshakeHandle};
use crate::constants;

/// Message from the host page to the frame.
#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    /// The host page confirms the connection.
    Connect,
    /// The host page refuses the connection.
    Reject(String),
    /// Application payload.
    Data(serde_json::Value),
}

/// Host side of a [`LocalMessenger`].
#[derive(Debug, Clone)]
pub struct HostPort {
    tx: mpsc::Sender<HostMessage>,
}

impl HostPort {
    /// Send `message` to the frame.
    pub async fn send(&self, message: HostMessage) -> Result<()> {
        self.tx
            .send(message)
            .await
            .map_err(|e| anyhow::anyhow!("Frame listener is gone: {e}"))
    }

    /// Convenience for [`HostMessage::Connect`].
    pub async fn connect(&self) -> Result<()> {
        self.send(HostMessage::Connect).await
    }
}

/// Frame side of an in-process host/frame link.
#[derive(Debug)]
pub struct LocalMessenger {
    host_rx: Option<mpsc::Receiver<HostMessage>>,
    inbox_tx: mpsc::Sender<serde_json::Value>,
    inbox_rx: Option<mpsc::Receiver<serde_json::Value>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl LocalMessenger {
    /// Create a linked messenger and host port.
    pub fn pair() -> (Self, HostPort) {
        let (tx, rx) = mpsc::channel(constants::FRAME_MESSAGE_BUFFER);
        let (inbox_tx, inbox_rx) = mpsc::channel(constants::FRAME_MESSAGE_BUFFER);
        (
            Self {
                host_rx: Some(rx),
                inbox_tx,
                inbox_rx: Some(inbox_rx),
                shutdown_tx: None,
            },
            HostPort { tx },
        )
    }

    /// Take the receiver for host data messages. Returns `None` after the
    /// first call.
    pub fn take_inbox(&mut self) -> Option<mpsc::Receiver<serde_json::Value>> {
        self.inbox_rx.take()
    }

    /// Whether the listener task is running.
    pub fn is_listening(&self) -> bool {
        self.shutdown_tx.is_some()
    }
}

async fn run_listener(
    mut host_rx: mpsc::Receiver<HostMessage>,
    inbox_tx: mpsc::Sender<serde_json::Value>,
    handshake: HandshakeHandle,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                log::debug!("[Frame] Listener stopped");
                break;
            }
            message = host_rx.recv() => match message {
                Some(HostMessage::Connect) => {
                    if handshake.resolve() {
                        log::info!("[Frame] Host page connected");
                    }
                }
                Some(HostMessage::Reject(reason)) => {
                    if handshake.reject(reason.clone()) {
                        log::warn!("[Frame] Host page rejected connection: {}", reason);
                    }
                }
                Some(HostMessage::Data(payload)) => {
                    if inbox_tx.send(payload).await.is_err() {
                        log::debug!("[Frame] Inbox closed, dropping host message");
                    }
                }
                None => {
                    log::debug!("[Frame] Host port closed");
                    break;
                }
            }
        }
    }
}

#[async_trait]
impl FrameMessenger for LocalMessenger {
    async fn establish(&mut self, handshake: HandshakeHandle) -> Result<()> {
        let host_rx = self
            .host_rx
            .take()
            .context("Messenger already established")?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        tokio::spawn(run_listener(
            host_rx,
            self.inbox_tx.clone(),
            handshake,
            shutdown_rx,
        ));
        Ok(())
    }

    fn destroy(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for LocalMessenger {
    fn drop(&mut self) {
        self.destroy();
    }
}
