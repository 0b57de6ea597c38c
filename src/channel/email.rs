//! Email secondary channel.
//!
//! Forwards lifecycle events to the email updaters and handles the two
//! email-specific identity operations: logout and identifier changes. After
//! an identifier change the push record is relinked so its back-reference
//! (`parent_player_id`, `email`) points at the active email record.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::updaters::EmailUpdaters;
use super::{
    ChannelEvents, ChannelSynchronizer, NotSubscribedError, NotSubscribedReason, SecondaryChannel,
};
use crate::api::{PlayerApi, PlayerUpdate};
use crate::models::{AppConfig, ChannelProfile, Tags};
use crate::store::Store;

/// The email channel.
pub struct EmailChannel {
    updaters: EmailUpdaters,
    store: Arc<dyn Store>,
    api: Arc<dyn PlayerApi>,
}

impl EmailChannel {
    /// Build an email channel over `store` and `api`.
    pub fn new(updaters: EmailUpdaters, store: Arc<dyn Store>, api: Arc<dyn PlayerApi>) -> Self {
        Self {
            updaters,
            store,
            api,
        }
    }

    /// Build an email channel and register it with `synchronizer`.
    pub fn register(
        synchronizer: &mut ChannelSynchronizer,
        store: Arc<dyn Store>,
        api: Arc<dyn PlayerApi>,
    ) -> Arc<Self> {
        let updaters = EmailUpdaters::new(Arc::clone(&store), Arc::clone(&api));
        let channel = Arc::new(Self::new(updaters, store, api));
        synchronizer.register_channel(Arc::clone(&channel) as Arc<dyn ChannelEvents>);
        channel
    }

    /// Point the push record at `new_profile` if it changed.
    ///
    /// Sends `parent_player_id`, `email` and the stored external user id auth
    /// hash to the push player when a device id is stored and the email
    /// subscription id or identifier differs from `existing_profile` (or was
    /// never saved). One-way and not retried; failures are logged.
    pub async fn relink_push_player(
        &self,
        existing_profile: &ChannelProfile,
        new_profile: &ChannelProfile,
    ) -> Result<()> {
        let Some(device_id) = self.store.device_subscription()?.device_id else {
            return Ok(());
        };
        if !needs_relink(existing_profile, new_profile) {
            return Ok(());
        }

        let auth_hash = self.store.external_user_id_auth_hash()?;
        let Some(app_config) = self.store.app_config()? else {
            log::warn!("No app config stored; cannot relink push player {}", device_id);
            return Ok(());
        };

        let update = PlayerUpdate {
            parent_player_id: new_profile.subscription_id.clone(),
            email: new_profile.identifier.clone(),
            external_user_id_auth_hash: auth_hash,
            ..PlayerUpdate::default()
        };
        match self
            .api
            .update_player(&app_config.app_id, &device_id, &update)
            .await
        {
            Ok(true) => log::debug!("Push player {} relinked to email record", device_id),
            Ok(false) => log::warn!("Push player {} rejected email relink", device_id),
            Err(e) => log::warn!("Failed to relink push player {}: {:#}", device_id, e),
        }
        Ok(())
    }

    fn logout_state(&self) -> Result<(Option<String>, ChannelProfile, Option<AppConfig>)> {
        Ok((
            self.store.device_subscription()?.device_id,
            self.store.email_profile()?,
            self.store.app_config()?,
        ))
    }
}

/// Whether the push record's email back-reference is out of date.
pub fn needs_relink(existing: &ChannelProfile, new: &ChannelProfile) -> bool {
    let subscription_changed =
        existing.subscription_id.is_none() || existing.subscription_id != new.subscription_id;
    let identifier_changed = existing.identifier.is_none() || existing.identifier != new.identifier;
    subscription_changed || identifier_changed
}

#[async_trait]
impl SecondaryChannel for EmailChannel {
    async fn logout(&self) -> bool {
        let (device_id, profile, app_config) = match self.logout_state() {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Failed to read email state for logout: {:#}", e);
                return false;
            }
        };

        let Some(device_id) = device_id else {
            log::warn!("{}", NotSubscribedError::new(NotSubscribedReason::NoDeviceId));
            return false;
        };
        if profile.subscription_id.is_none() {
            log::warn!("{}", NotSubscribedError::new(NotSubscribedReason::NoEmailSet));
            return false;
        }
        let Some(app_config) = app_config else {
            log::warn!("Failed to logout email: no app config stored");
            return false;
        };

        match self.api.logout_email(&app_config, &profile, &device_id).await {
            Ok(true) => {}
            Ok(false) => {
                log::warn!("Failed to logout email.");
                return false;
            }
            Err(e) => {
                log::warn!("Failed to logout email: {:#}", e);
                return false;
            }
        }

        if let Err(e) = self.store.set_email_profile(ChannelProfile::default()) {
            log::warn!("Email logged out remotely but local profile was not cleared: {:#}", e);
            return false;
        }
        true
    }

    async fn set_identifier(
        &self,
        identifier: &str,
        auth_hash: Option<&str>,
    ) -> Result<Option<String>> {
        let profile_provider = self.updaters.identifier.profile_provider();
        let existing_profile = profile_provider.get_profile()?;
        let new_subscription_id = self
            .updaters
            .identifier
            .set_identifier(identifier, auth_hash)
            .await?;

        if let Some(id) = &new_subscription_id {
            let new_profile = profile_provider.new_profile(id, identifier, auth_hash);
            self.relink_push_player(&existing_profile, &new_profile).await?;
        }

        Ok(new_subscription_id)
    }
}

#[async_trait]
impl ChannelEvents for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    async fn on_session(&self) -> Result<()> {
        self.updaters.session.send_on_session().await
    }

    async fn on_focus(&self, duration_secs: u64) -> Result<()> {
        self.updaters.focus.send_on_focus(duration_secs).await
    }

    async fn set_tags(&self, tags: &Tags) -> Result<()> {
        self.updaters.tags.send_tags(tags).await
    }

    async fn set_external_user_id(&self, id: &str, auth_hash: Option<&str>) -> Result<()> {
        self.updaters
            .external_user_id
            .set_external_user_id(id, auth_hash)
            .await
    }
}

impl std::fmt::Debug for EmailChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailChannel")
            .field("updaters", &self.updaters)
            .finish_non_exhaustive()
    }
}
