//! Tag updates for the email record.

use anyhow::Result;
use std::sync::Arc;

use super::EmailProfileProvider;
use crate::api::{PlayerApi, PlayerUpdate};
use crate::models::Tags;

/// Mirrors tag updates onto the email record.
#[derive(Clone)]
pub struct TagsUpdater {
    profile_provider: EmailProfileProvider,
    api: Arc<dyn PlayerApi>,
}

impl TagsUpdater {
    /// Updater over `profile_provider` and `api`.
    pub fn new(profile_provider: EmailProfileProvider, api: Arc<dyn PlayerApi>) -> Self {
        Self {
            profile_provider,
            api,
        }
    }

    /// Send `tags` to the email record, if there is one.
    pub async fn send_tags(&self, tags: &Tags) -> Result<()> {
        let Some(email_id) = self.profile_provider.subscription_id()? else {
            log::debug!("No email subscription; skipping tag update");
            return Ok(());
        };
        let app_id = self.profile_provider.app_id()?;

        let update = PlayerUpdate {
            tags: Some(tags.clone()),
            ..PlayerUpdate::default()
        };
        if !self.api.update_player(&app_id, &email_id, &update).await? {
            log::warn!("Email record {} rejected tag update", email_id);
        }
        Ok(())
    }
}

impl std::fmt::Debug for TagsUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagsUpdater").finish_non_exhaustive()
    }
}
