//! The remote frame itself.

use anyhow::Result;
use std::sync::Arc;

use super::context::{SdkConfig, SdkContext};
use super::handshake::{load_signal, HandshakeHandle, HandshakeOutcome, LoadWaiter};
use super::options::{FrameInitOptions, FrameOptionsError};
use super::{FrameError, FrameMessenger, HostWindow, PushRegistrar, WorkerMessenger};
use crate::constants;
use crate::store::Store;

/// Lifecycle of a [`RemoteFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// `initialize` has not run.
    Uninitialized,
    /// Opened directly; initialization refused.
    Refused,
    /// Messaging is up; waiting for the host page.
    AwaitingHandshake,
    /// The host page confirmed the connection.
    Initialized,
    /// Messaging could not start or the handshake was rejected.
    Failed,
}

/// Browser-side collaborators of a [`RemoteFrame`].
pub struct FrameServices {
    /// Window the frame runs in.
    pub host: Arc<dyn HostWindow>,
    /// Cross-window messaging with the host page.
    pub messenger: Box<dyn FrameMessenger>,
    /// Service worker listener.
    pub worker_messenger: Arc<dyn WorkerMessenger>,
    /// Push registration entry point.
    pub registrar: Arc<dyn PushRegistrar>,
    /// Persisted local state.
    pub store: Arc<dyn Store>,
}

/// Embedded frame that relays messages between the host page and the SDK.
pub struct RemoteFrame {
    options: FrameInitOptions,
    services: FrameServices,
    handshake: HandshakeHandle,
    waiter: Option<LoadWaiter>,
    state: FrameState,
}

impl RemoteFrame {
    /// Create a frame from validated options.
    pub fn new(options: FrameInitOptions, services: FrameServices) -> Self {
        let (handshake, waiter) = load_signal();
        Self {
            options,
            services,
            handshake,
            waiter: Some(waiter),
            state: FrameState::Uninitialized,
        }
    }

    /// Create a frame from the raw init record passed by the embedding page.
    pub fn from_raw(raw: &serde_json::Value, services: FrameServices) -> Result<Self, FrameOptionsError> {
        Ok(Self::new(FrameInitOptions::from_raw(raw)?, services))
    }

    /// Validated init options.
    pub fn options(&self) -> &FrameInitOptions {
        &self.options
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Resolve/reject controls for the pending handshake.
    ///
    /// Clone this before calling [`initialize`](Self::initialize) to settle
    /// the handshake from another task.
    pub fn handshake_handle(&self) -> HandshakeHandle {
        self.handshake.clone()
    }

    /// Bootstrap the frame and wait for the host page handshake.
    ///
    /// Returns `Ok(None)` without touching messaging when the frame was opened
    /// directly. Otherwise returns the SDK context once the host page
    /// connects. There is no load timeout: the frame waits for the first
    /// handshake indefinitely.
    pub async fn initialize(&mut self) -> Result<Option<Arc<SdkContext>>, FrameError> {
        let host = Arc::clone(&self.services.host);
        if !host.has_opener() && !host.has_parent() {
            host.write_error(constants::FRAME_DIRECT_OPEN_MESSAGE);
            self.state = FrameState::Refused;
            log::warn!("[Frame] Opened directly; not initializing");
            return Ok(None);
        }

        let waiter = self.waiter.take().ok_or(FrameError::AlreadyInitialized)?;

        let config = SdkConfig::from_options(&self.options);
        let app_config = config.app_config();
        self.services
            .store
            .set_app_config(app_config.clone())
            .map_err(|e| FrameError::Store(format!("{e:#}")))?;

        let context = Arc::new(SdkContext {
            config,
            app_config,
            environment: host.environment_info(),
            worker_messenger: Arc::clone(&self.services.worker_messenger),
        });
        context.worker_messenger.listen(true);

        self.state = FrameState::AwaitingHandshake;
        if let Err(e) = self.establish_cross_origin_messaging().await {
            self.state = FrameState::Failed;
            return Err(e);
        }
        log::debug!("[Frame] Waiting for host page handshake");

        let reason = match waiter.wait().await {
            HandshakeOutcome::Connected => {
                self.state = FrameState::Initialized;
                log::info!("[Frame] Initialized for app {}", context.app_config.app_id);
                return Ok(Some(context));
            }
            HandshakeOutcome::Rejected(reason) => reason,
            // Unreachable while `self.handshake` holds a sender
            HandshakeOutcome::Abandoned => "handshake abandoned".to_string(),
        };
        self.state = FrameState::Failed;
        log::warn!("[Frame] Handshake failed: {}", reason);
        Err(FrameError::HandshakeRejected(reason))
    }

    /// Start cross-window messaging, handing it the handshake controls.
    pub async fn establish_cross_origin_messaging(&mut self) -> Result<(), FrameError> {
        self.services
            .messenger
            .establish(self.handshake.clone())
            .await
            .map_err(|e| FrameError::Messaging(format!("{e:#}")))
    }

    /// Mark the handshake complete.
    pub fn finish_initialization(&self) {
        self.handshake.resolve();
    }

    /// Register for push, or close the popup if already subscribed.
    pub async fn subscribe(&self) -> Result<()> {
        if !self.services.store.is_push_enabled()? {
            log::debug!("[Frame] Push not enabled; registering");
            return self.services.registrar.register_for_push().await;
        }
        if self.services.host.has_opener() {
            log::debug!("[Frame] Already subscribed; closing popup");
            self.services.host.close();
        }
        Ok(())
    }

    /// Release the messenger's listeners.
    pub fn dispose(&mut self) {
        self.services.messenger.destroy();
    }
}

impl std::fmt::Debug for RemoteFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteFrame")
            .field("options", &self.options)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for FrameServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameServices").finish_non_exhaustive()
    }
}
