//! Data model shared by channels, the store and the API client.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User-supplied segmentation tags.
pub type Tags = HashMap<String, String>;

/// A user's registration on one secondary channel.
///
/// For email this is the address and the server-assigned subscription
/// (player) id. Replaced wholesale on logout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelProfile {
    /// Server-assigned subscription id for this channel record.
    #[serde(default)]
    pub subscription_id: Option<String>,
    /// Channel identifier (e.g., the email address).
    #[serde(default)]
    pub identifier: Option<String>,
    /// Identity verification hash for `identifier`, if the app requires one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_auth_hash: Option<String>,
}

impl ChannelProfile {
    /// Build a profile for a freshly assigned subscription.
    pub fn new(
        subscription_id: Option<String>,
        identifier: Option<String>,
        identifier_auth_hash: Option<String>,
    ) -> Self {
        Self {
            subscription_id,
            identifier,
            identifier_auth_hash,
        }
    }

    /// Whether a subscription id has been recorded.
    pub fn is_subscribed(&self) -> bool {
        self.subscription_id.is_some()
    }
}

/// The primary push channel registration for this device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSubscription {
    /// Push player id; other channels link back to it.
    #[serde(default)]
    pub device_id: Option<String>,
    /// Push service endpoint, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_endpoint: Option<String>,
    /// Whether the user explicitly opted out of push.
    #[serde(default)]
    pub opted_out: bool,
}

/// Application configuration persisted after initialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application id (UUID).
    pub app_id: String,
    /// Subdomain hosting the remote frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    /// Site origin configured for the app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Human-readable site name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

impl AppConfig {
    /// Minimal app config with only an app id.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            subdomain: None,
            origin: None,
            site_name: None,
        }
    }
}
