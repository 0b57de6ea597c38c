//! Session reporting for the email record.

use anyhow::Result;
use std::sync::Arc;

use super::EmailProfileProvider;
use crate::api::{EmailPlayerRecord, PlayerApi};

/// Reports new sessions against the email record.
#[derive(Clone)]
pub struct SessionUpdater {
    profile_provider: EmailProfileProvider,
    api: Arc<dyn PlayerApi>,
}

impl SessionUpdater {
    /// Updater over `profile_provider` and `api`.
    pub fn new(profile_provider: EmailProfileProvider, api: Arc<dyn PlayerApi>) -> Self {
        Self {
            profile_provider,
            api,
        }
    }

    /// Report a session start, if an email record exists.
    pub async fn send_on_session(&self) -> Result<()> {
        let profile = self.profile_provider.get_profile()?;
        let (Some(email_id), Some(identifier)) = (profile.subscription_id, profile.identifier)
        else {
            log::debug!("No email subscription; skipping on_session");
            return Ok(());
        };
        let app_id = self.profile_provider.app_id()?;
        let device_id = self
            .profile_provider
            .store()
            .device_subscription()?
            .device_id;

        let record = EmailPlayerRecord {
            identifier_auth_hash: profile.identifier_auth_hash,
            device_player_id: device_id,
            ..EmailPlayerRecord::new(app_id, identifier)
        };
        self.api.on_session(&email_id, &record).await
    }
}

impl std::fmt::Debug for SessionUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionUpdater").finish_non_exhaustive()
    }
}
