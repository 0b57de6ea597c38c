//! Per-event updaters for the email channel.
//!
//! Each updater owns exactly one remote call. They all read the email
//! profile through [`EmailProfileProvider`] and do nothing (beyond a debug
//! log) when no email subscription is stored.

mod external_user_id;
mod focus;
mod identifier;
mod session;
mod tags;

pub use external_user_id::ExternalUserIdUpdater;
pub use focus::FocusUpdater;
pub use identifier::IdentifierUpdater;
pub use session::SessionUpdater;
pub use tags::TagsUpdater;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::api::PlayerApi;
use crate::models::ChannelProfile;
use crate::store::Store;

/// Reads and writes the email [`ChannelProfile`].
#[derive(Clone)]
pub struct EmailProfileProvider {
    store: Arc<dyn Store>,
}

impl EmailProfileProvider {
    /// Provider over `store`.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Current email profile.
    pub fn get_profile(&self) -> Result<ChannelProfile> {
        self.store.email_profile()
    }

    /// Persist `profile`, replacing the previous one.
    pub fn set_profile(&self, profile: ChannelProfile) -> Result<()> {
        self.store.set_email_profile(profile)
    }

    /// Build a profile for a newly assigned email subscription.
    pub fn new_profile(
        &self,
        subscription_id: &str,
        identifier: &str,
        auth_hash: Option<&str>,
    ) -> ChannelProfile {
        ChannelProfile::new(
            Some(subscription_id.to_string()),
            Some(identifier.to_string()),
            auth_hash.map(str::to_string),
        )
    }

    /// App id from the stored app config.
    pub fn app_id(&self) -> Result<String> {
        self.store
            .app_config()?
            .map(|c| c.app_id)
            .context("No app config stored; initialize the SDK first")
    }

    /// Stored email subscription id, if any.
    fn subscription_id(&self) -> Result<Option<String>> {
        Ok(self.get_profile()?.subscription_id)
    }

    /// Underlying store.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}

impl std::fmt::Debug for EmailProfileProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailProfileProvider").finish_non_exhaustive()
    }
}

/// All updaters an [`EmailChannel`](super::EmailChannel) needs.
#[derive(Debug)]
pub struct EmailUpdaters {
    /// Identifier (email address) changes.
    pub identifier: IdentifierUpdater,
    /// External user id changes.
    pub external_user_id: ExternalUserIdUpdater,
    /// Tag updates.
    pub tags: TagsUpdater,
    /// Session starts.
    pub session: SessionUpdater,
    /// Focus durations.
    pub focus: FocusUpdater,
}

impl EmailUpdaters {
    /// Build every updater over the same store and API.
    pub fn new(store: Arc<dyn Store>, api: Arc<dyn PlayerApi>) -> Self {
        let provider = EmailProfileProvider::new(store);
        Self {
            identifier: IdentifierUpdater::new(provider.clone(), Arc::clone(&api)),
            external_user_id: ExternalUserIdUpdater::new(provider.clone(), Arc::clone(&api)),
            tags: TagsUpdater::new(provider.clone(), Arc::clone(&api)),
            session: SessionUpdater::new(provider.clone(), Arc::clone(&api)),
            focus: FocusUpdater::new(provider, api),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Recording [`PlayerApi`] shared by the channel tests.

    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::api::{EmailPlayerRecord, FocusPayload, PlayerApi, PlayerUpdate};
    use crate::models::{AppConfig, ChannelProfile};

    /// One recorded API call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum ApiCall {
        Create(EmailPlayerRecord),
        Update {
            app_id: String,
            player_id: String,
            update: PlayerUpdate,
        },
        Logout {
            app_id: String,
            email_id: Option<String>,
            device_id: String,
        },
        Session(String, EmailPlayerRecord),
        Focus(String, FocusPayload),
    }

    /// Fake API with scripted responses.
    #[derive(Debug)]
    pub struct FakeApi {
        pub calls: Mutex<Vec<ApiCall>>,
        pub created_id: Option<String>,
        pub update_ok: bool,
        pub logout_ok: bool,
        pub fail_transport: bool,
    }

    impl Default for FakeApi {
        fn default() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                created_id: Some("email-new".to_string()),
                update_ok: true,
                logout_ok: true,
                fail_transport: false,
            }
        }
    }

    impl FakeApi {
        pub fn calls(&self) -> Vec<ApiCall> {
            self.calls.lock().unwrap().clone()
        }

        fn push(&self, call: ApiCall) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if self.fail_transport {
                anyhow::bail!("connection refused");
            }
            Ok(())
        }
    }

    #[async_trait]
    impl PlayerApi for FakeApi {
        async fn create_email_player(&self, record: &EmailPlayerRecord) -> Result<Option<String>> {
            self.push(ApiCall::Create(record.clone()))?;
            Ok(self.created_id.clone())
        }

        async fn update_player(
            &self,
            app_id: &str,
            player_id: &str,
            update: &PlayerUpdate,
        ) -> Result<bool> {
            self.push(ApiCall::Update {
                app_id: app_id.to_string(),
                player_id: player_id.to_string(),
                update: update.clone(),
            })?;
            Ok(self.update_ok)
        }

        async fn logout_email(
            &self,
            app_config: &AppConfig,
            profile: &ChannelProfile,
            device_id: &str,
        ) -> Result<bool> {
            self.push(ApiCall::Logout {
                app_id: app_config.app_id.clone(),
                email_id: profile.subscription_id.clone(),
                device_id: device_id.to_string(),
            })?;
            Ok(self.logout_ok)
        }

        async fn on_session(&self, player_id: &str, record: &EmailPlayerRecord) -> Result<()> {
            self.push(ApiCall::Session(player_id.to_string(), record.clone()))
        }

        async fn on_focus(&self, player_id: &str, payload: &FocusPayload) -> Result<()> {
            self.push(ApiCall::Focus(player_id.to_string(), payload.clone()))
        }
    }
}
