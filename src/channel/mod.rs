//! Secondary channel abstraction.
//!
//! A secondary channel is any notification channel other than the primary
//! push channel (today: email). Secondary channels mirror the push
//! channel's lifecycle events so a user's session, tags and identity stay
//! consistent everywhere they are subscribed.
//!
//! # Architecture
//!
//! ```text
//! ChannelSynchronizer
//!     │  on_session / on_focus / set_tags / set_external_user_id
//!     │  (fan-out, all channels started together)
//!     │
//!     └── EmailChannel (ChannelEvents + SecondaryChannel)
//!             ├── SessionUpdater / FocusUpdater / TagsUpdater / ExternalUserIdUpdater
//!             └── IdentifierUpdater ──► relink push player to email player
//! ```

// Rust guideline compliant 2025-01

pub mod controller;
pub mod email;
pub mod updaters;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Tags;

pub use controller::ChannelSynchronizer;
pub use email::EmailChannel;

/// Why a channel operation found nothing to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotSubscribedReason {
    /// No push device id is stored.
    NoDeviceId,
    /// No email subscription id is stored.
    NoEmailSet,
}

/// A channel operation required a subscription that does not exist.
///
/// Reported as a warning; never returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotSubscribedError {
    /// What was missing.
    pub reason: NotSubscribedReason,
}

impl NotSubscribedError {
    /// Error for `reason`.
    pub fn new(reason: NotSubscribedReason) -> Self {
        Self { reason }
    }
}

impl std::fmt::Display for NotSubscribedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            NotSubscribedReason::NoDeviceId => {
                write!(f, "Not subscribed: this operation requires a push device id")
            }
            NotSubscribedReason::NoEmailSet => {
                write!(f, "Not subscribed: no email address has been set")
            }
        }
    }
}

impl std::error::Error for NotSubscribedError {}

/// Lifecycle events every secondary channel mirrors from the push channel.
#[async_trait]
pub trait ChannelEvents: Send + Sync {
    /// Short channel name for logging (e.g., "email").
    fn name(&self) -> &str;

    /// A new session started.
    async fn on_session(&self) -> Result<()>;

    /// The page was focused for `duration_secs` seconds.
    async fn on_focus(&self, duration_secs: u64) -> Result<()>;

    /// Tags were updated.
    async fn set_tags(&self, tags: &Tags) -> Result<()>;

    /// The external user id was set.
    async fn set_external_user_id(&self, id: &str, auth_hash: Option<&str>) -> Result<()>;
}

/// Identity operations specific to a secondary channel.
#[async_trait]
pub trait SecondaryChannel: Send + Sync {
    /// Log out of the channel. Best effort: returns `false` on any failure.
    async fn logout(&self) -> bool;

    /// Set the channel identifier (e.g., an email address).
    ///
    /// Returns the subscription id assigned to the identifier, if any.
    async fn set_identifier(&self, identifier: &str, auth_hash: Option<&str>)
        -> Result<Option<String>>;
}
