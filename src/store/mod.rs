//! Persisted local state.
//!
//! The SDK keeps a handful of records on the device: the push subscription,
//! the email profile, the app config, the external user id auth hash and
//! whether push notifications are enabled. Callers treat the store as an
//! opaque key-value record; nothing here guards against concurrent writers
//! beyond a per-store mutex.
//!
//! # Implementations
//!
//! - [`MemoryStore`] - in-process, used by tests and the frame bootstrap
//! - [`FileStore`] - single JSON file, used by the CLI

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::{AppConfig, ChannelProfile, DeviceSubscription};

/// Full snapshot of the persisted state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    /// Push channel registration.
    #[serde(default)]
    pub subscription: DeviceSubscription,
    /// Email channel registration.
    #[serde(default)]
    pub email_profile: ChannelProfile,
    /// App config, once initialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_config: Option<AppConfig>,
    /// Auth hash supplied with the last external user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_user_id_auth_hash: Option<String>,
    /// Whether push notifications are enabled on this device.
    #[serde(default)]
    pub push_enabled: bool,
}

/// Read/write access to the persisted local state.
pub trait Store: Send + Sync {
    /// Current push channel registration.
    fn device_subscription(&self) -> Result<DeviceSubscription>;

    /// Replace the push channel registration.
    fn set_device_subscription(&self, subscription: DeviceSubscription) -> Result<()>;

    /// Current email profile (empty when never registered).
    fn email_profile(&self) -> Result<ChannelProfile>;

    /// Replace the email profile.
    fn set_email_profile(&self, profile: ChannelProfile) -> Result<()>;

    /// Persisted app config, if any.
    fn app_config(&self) -> Result<Option<AppConfig>>;

    /// Replace the app config.
    fn set_app_config(&self, config: AppConfig) -> Result<()>;

    /// Auth hash recorded with the external user id.
    fn external_user_id_auth_hash(&self) -> Result<Option<String>>;

    /// Record the external user id auth hash.
    fn set_external_user_id_auth_hash(&self, hash: Option<String>) -> Result<()>;

    /// Whether push notifications are enabled locally.
    fn is_push_enabled(&self) -> Result<bool>;

    /// Record whether push notifications are enabled locally.
    fn set_push_enabled(&self, enabled: bool) -> Result<()>;
}
