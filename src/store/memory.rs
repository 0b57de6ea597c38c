//! In-memory [`Store`] implementation.

use anyhow::Result;
use std::sync::Mutex;

use super::{Store, StoreState};
use crate::models::{AppConfig, ChannelProfile, DeviceSubscription};

/// Store backed by a mutex-guarded [`StoreState`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `state`.
    pub fn with_state(state: StoreState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> StoreState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        // A poisoned lock still holds consistent plain data
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    fn device_subscription(&self) -> Result<DeviceSubscription> {
        Ok(self.lock().subscription.clone())
    }

    fn set_device_subscription(&self, subscription: DeviceSubscription) -> Result<()> {
        self.lock().subscription = subscription;
        Ok(())
    }

    fn email_profile(&self) -> Result<ChannelProfile> {
        Ok(self.lock().email_profile.clone())
    }

    fn set_email_profile(&self, profile: ChannelProfile) -> Result<()> {
        self.lock().email_profile = profile;
        Ok(())
    }

    fn app_config(&self) -> Result<Option<AppConfig>> {
        Ok(self.lock().app_config.clone())
    }

    fn set_app_config(&self, config: AppConfig) -> Result<()> {
        self.lock().app_config = Some(config);
        Ok(())
    }

    fn external_user_id_auth_hash(&self) -> Result<Option<String>> {
        Ok(self.lock().external_user_id_auth_hash.clone())
    }

    fn set_external_user_id_auth_hash(&self, hash: Option<String>) -> Result<()> {
        self.lock().external_user_id_auth_hash = hash;
        Ok(())
    }

    fn is_push_enabled(&self) -> Result<bool> {
        Ok(self.lock().push_enabled)
    }

    fn set_push_enabled(&self, enabled: bool) -> Result<()> {
        self.lock().push_enabled = enabled;
        Ok(())
    }
}
