//! Remote frame bootstrap.
//!
//! The remote frame is an embedded cross-origin iframe (or popup) that the
//! host page opens to reach the SDK's own origin. Bootstrapping it means:
//!
//! 1. Refusing to run when opened directly (no opener and no parent)
//! 2. Validating the untyped init options from the embedding page
//! 3. Building an owned [`SdkContext`] and persisting the app config
//! 4. Starting the service worker listener
//! 5. Establishing cross-window messaging and waiting for the handshake
//!
//! Browser mechanics are behind traits: [`HostWindow`], [`FrameMessenger`],
//! [`WorkerMessenger`] and [`PushRegistrar`]. [`LocalMessenger`] is an
//! in-process messenger for the CLI and tests.
//!
//! # States
//!
//! ```text
//! Uninitialized ──► AwaitingHandshake ──► Initialized
//!       │                   │
//!       │                   └──► Failed (messaging error or rejected handshake)
//!       └──► Refused (opened directly)
//! ```

// Rust guideline compliant 2025-01

pub mod context;
pub mod handshake;
pub mod local;
pub mod options;
pub mod remote;

pub use context::{EnvironmentInfo, SdkConfig, SdkContext};
pub use handshake::{load_signal, HandshakeHandle, HandshakeOutcome, LoadWaiter};
pub use local::{HostMessage, HostPort, LocalMessenger};
pub use options::{FrameInitOptions, FrameOptionsError, MetricsOptions};
pub use remote::{FrameServices, FrameState, RemoteFrame};

use anyhow::Result;
use async_trait::async_trait;

/// The browser window the frame runs in.
pub trait HostWindow: Send + Sync {
    /// Whether the frame was opened by another window (popup).
    fn has_opener(&self) -> bool;

    /// Whether the frame is embedded in a parent distinct from itself.
    fn has_parent(&self) -> bool;

    /// Replace the document with a visible error message.
    fn write_error(&self, html: &str);

    /// Close the window.
    fn close(&self);

    /// Facts about the hosting browser.
    fn environment_info(&self) -> EnvironmentInfo;
}

/// Cross-window messaging with the host page.
#[async_trait]
pub trait FrameMessenger: Send + Sync {
    /// Start listening for the host page. The messenger resolves or rejects
    /// `handshake` when the host page answers.
    async fn establish(&mut self, handshake: HandshakeHandle) -> Result<()>;

    /// Remove every listener registered by [`establish`](Self::establish).
    fn destroy(&mut self);
}

/// Listener for messages from the service worker.
pub trait WorkerMessenger: Send + Sync {
    /// Start listening. `listen_for_page_messages` also accepts messages
    /// relayed from the page.
    fn listen(&self, listen_for_page_messages: bool);
}

/// Push registration entry point.
#[async_trait]
pub trait PushRegistrar: Send + Sync {
    /// Prompt for permission and register for push.
    async fn register_for_push(&self) -> Result<()>;
}

/// Errors from frame initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// `initialize` was called more than once.
    AlreadyInitialized,
    /// Local state could not be written.
    Store(String),
    /// The messenger could not start listening.
    Messaging(String),
    /// The handshake was rejected.
    HandshakeRejected(String),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyInitialized => write!(f, "Frame already initialized"),
            Self::Store(msg) => write!(f, "Store error: {msg}"),
            Self::Messaging(msg) => write!(f, "Messaging failed: {msg}"),
            Self::HandshakeRejected(reason) => write!(f, "Handshake rejected: {reason}"),
        }
    }
}

impl std::error::Error for FrameError {}
