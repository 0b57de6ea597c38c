//! Active-time reporting for the email record.

use anyhow::Result;
use std::sync::Arc;

use super::EmailProfileProvider;
use crate::api::{FocusPayload, PlayerApi};

/// Reports focus durations against the email record.
#[derive(Clone)]
pub struct FocusUpdater {
    profile_provider: EmailProfileProvider,
    api: Arc<dyn PlayerApi>,
}

impl FocusUpdater {
    /// Updater over `profile_provider` and `api`.
    pub fn new(profile_provider: EmailProfileProvider, api: Arc<dyn PlayerApi>) -> Self {
        Self {
            profile_provider,
            api,
        }
    }

    /// Report `duration_secs` of active time, if an email record exists.
    pub async fn send_on_focus(&self, duration_secs: u64) -> Result<()> {
        let Some(email_id) = self.profile_provider.subscription_id()? else {
            log::debug!("No email subscription; skipping on_focus");
            return Ok(());
        };
        let app_id = self.profile_provider.app_id()?;

        self.api
            .on_focus(&email_id, &FocusPayload::email(app_id, duration_secs))
            .await
    }
}

impl std::fmt::Debug for FocusUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusUpdater").finish_non_exhaustive()
    }
}
