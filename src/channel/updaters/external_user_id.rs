//! External user id updates for the email record.

use anyhow::Result;
use std::sync::Arc;

use super::EmailProfileProvider;
use crate::api::{PlayerApi, PlayerUpdate};

/// Mirrors the external user id onto the email record.
#[derive(Clone)]
pub struct ExternalUserIdUpdater {
    profile_provider: EmailProfileProvider,
    api: Arc<dyn PlayerApi>,
}

impl ExternalUserIdUpdater {
    /// Updater over `profile_provider` and `api`.
    pub fn new(profile_provider: EmailProfileProvider, api: Arc<dyn PlayerApi>) -> Self {
        Self {
            profile_provider,
            api,
        }
    }

    /// Send `id` (and its auth hash) to the email record, if there is one.
    pub async fn set_external_user_id(&self, id: &str, auth_hash: Option<&str>) -> Result<()> {
        let Some(email_id) = self.profile_provider.subscription_id()? else {
            log::debug!("No email subscription; skipping external user id");
            return Ok(());
        };
        let app_id = self.profile_provider.app_id()?;

        let update = PlayerUpdate {
            external_user_id: Some(id.to_string()),
            external_user_id_auth_hash: auth_hash.map(str::to_string),
            ..PlayerUpdate::default()
        };
        if !self.api.update_player(&app_id, &email_id, &update).await? {
            log::warn!("Email record {} rejected external user id", email_id);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ExternalUserIdUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalUserIdUpdater").finish_non_exhaustive()
    }
}
