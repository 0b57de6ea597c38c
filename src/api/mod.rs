//! Player REST API.
//!
//! Provides the [`PlayerApi`] trait that channels and updaters call, and
//! [`ApiClient`], its reqwest-backed implementation.
//!
//! # Modules
//!
//! - [`client`] - HTTP client
//! - [`types`] - Request/response payloads

// Rust guideline compliant 2025-01

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{EmailPlayerRecord, FocusPayload, PlayerUpdate};

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AppConfig, ChannelProfile};

/// Remote player operations used by secondary channels.
///
/// A player is one subscription record on the server: the push device or an
/// email address.
#[async_trait]
pub trait PlayerApi: Send + Sync {
    /// Create an email player record.
    ///
    /// Returns the server-assigned player id, or `None` if the server
    /// accepted the request without returning one.
    async fn create_email_player(&self, record: &EmailPlayerRecord) -> Result<Option<String>>;

    /// Apply a partial update to a player record.
    ///
    /// Returns `Ok(false)` when the server rejected the update.
    async fn update_player(&self, app_id: &str, player_id: &str, update: &PlayerUpdate)
        -> Result<bool>;

    /// Detach the email player in `profile` from the push device `device_id`.
    async fn logout_email(
        &self,
        app_config: &AppConfig,
        profile: &ChannelProfile,
        device_id: &str,
    ) -> Result<bool>;

    /// Report a new session for a player.
    async fn on_session(&self, player_id: &str, record: &EmailPlayerRecord) -> Result<()>;

    /// Report active time for a player.
    async fn on_focus(&self, player_id: &str, payload: &FocusPayload) -> Result<()>;
}
