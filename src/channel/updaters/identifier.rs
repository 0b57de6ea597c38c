//! Email identifier (address) registration.

use anyhow::Result;
use std::sync::Arc;

use super::EmailProfileProvider;
use crate::api::{EmailPlayerRecord, PlayerApi, PlayerUpdate};

/// Registers or changes the email address for this device.
#[derive(Clone)]
pub struct IdentifierUpdater {
    profile_provider: EmailProfileProvider,
    api: Arc<dyn PlayerApi>,
}

impl IdentifierUpdater {
    /// Updater over `profile_provider` and `api`.
    pub fn new(profile_provider: EmailProfileProvider, api: Arc<dyn PlayerApi>) -> Self {
        Self {
            profile_provider,
            api,
        }
    }

    /// Profile provider shared with the owning channel.
    pub fn profile_provider(&self) -> &EmailProfileProvider {
        &self.profile_provider
    }

    /// Register `identifier`, returning its email subscription id.
    ///
    /// An existing email record is updated in place and keeps its id. With no
    /// existing record a new one is created and linked to the push device
    /// when one is stored. On success the new profile is persisted.
    pub async fn set_identifier(
        &self,
        identifier: &str,
        auth_hash: Option<&str>,
    ) -> Result<Option<String>> {
        let app_id = self.profile_provider.app_id()?;
        let existing = self.profile_provider.get_profile()?;

        let subscription_id = if let Some(existing_id) = existing.subscription_id {
            let update = PlayerUpdate {
                identifier: Some(identifier.to_string()),
                identifier_auth_hash: auth_hash.map(str::to_string),
                ..PlayerUpdate::default()
            };
            if self.api.update_player(&app_id, &existing_id, &update).await? {
                Some(existing_id)
            } else {
                log::warn!("Email record {} rejected identifier update", existing_id);
                None
            }
        } else {
            let device_id = self
                .profile_provider
                .store()
                .device_subscription()?
                .device_id;
            let record = EmailPlayerRecord {
                identifier_auth_hash: auth_hash.map(str::to_string),
                device_player_id: device_id,
                ..EmailPlayerRecord::new(app_id, identifier)
            };
            self.api.create_email_player(&record).await?
        };

        if let Some(id) = &subscription_id {
            self.profile_provider
                .set_profile(self.profile_provider.new_profile(id, identifier, auth_hash))?;
            log::info!("Email subscription {} set for identifier", id);
        }

        Ok(subscription_id)
    }
}

impl std::fmt::Debug for IdentifierUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierUpdater").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{ApiCall, FakeApi};
    use super::*;
    use crate::models::{AppConfig, ChannelProfile, DeviceSubscription};
    use crate::store::{MemoryStore, Store};

    fn setup(api: FakeApi) -> (Arc<MemoryStore>, Arc<FakeApi>, IdentifierUpdater) {
        let store = Arc::new(MemoryStore::new());
        store.set_app_config(AppConfig::new("app-1")).unwrap();
        let api = Arc::new(api);
        let updater = IdentifierUpdater::new(
            EmailProfileProvider::new(Arc::clone(&store) as Arc<dyn Store>),
            Arc::clone(&api) as Arc<dyn PlayerApi>,
        );
        (store, api, updater)
    }

    #[tokio::test]
    async fn test_creates_record_linked_to_device() {
        let (store, api, updater) = setup(FakeApi::default());
        store
            .set_device_subscription(DeviceSubscription {
                device_id: Some("push-1".to_string()),
                ..DeviceSubscription::default()
            })
            .unwrap();

        let id = updater.set_identifier("a@x.com", Some("h")).await.unwrap();

        assert_eq!(id.as_deref(), Some("email-new"));
        match &api.calls()[..] {
            [ApiCall::Create(record)] => {
                assert_eq!(record.identifier, "a@x.com");
                assert_eq!(record.device_player_id.as_deref(), Some("push-1"));
                assert_eq!(record.identifier_auth_hash.as_deref(), Some("h"));
            }
            other => panic!("unexpected calls: {other:?}"),
        }
        assert_eq!(
            store.email_profile().unwrap(),
            ChannelProfile::new(
                Some("email-new".to_string()),
                Some("a@x.com".to_string()),
                Some("h".to_string())
            )
        );
    }

    #[tokio::test]
    async fn test_updates_existing_record_in_place() {
        let (store, api, updater) = setup(FakeApi::default());
        store
            .set_email_profile(ChannelProfile::new(
                Some("email-1".to_string()),
                Some("old@x.com".to_string()),
                None,
            ))
            .unwrap();

        let id = updater.set_identifier("new@x.com", None).await.unwrap();

        assert_eq!(id.as_deref(), Some("email-1"));
        assert!(matches!(
            &api.calls()[..],
            [ApiCall::Update { player_id, update, .. }]
                if player_id == "email-1" && update.identifier.as_deref() == Some("new@x.com")
        ));
        assert_eq!(
            store.email_profile().unwrap().identifier.as_deref(),
            Some("new@x.com")
        );
    }

    #[tokio::test]
    async fn test_rejected_update_keeps_profile() {
        let (store, _api, updater) = setup(FakeApi {
            update_ok: false,
            ..FakeApi::default()
        });
        let existing = ChannelProfile::new(
            Some("email-1".to_string()),
            Some("old@x.com".to_string()),
            None,
        );
        store.set_email_profile(existing.clone()).unwrap();

        assert!(updater.set_identifier("new@x.com", None).await.unwrap().is_none());
        assert_eq!(store.email_profile().unwrap(), existing);
    }

    #[tokio::test]
    async fn test_missing_app_config_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        let updater = IdentifierUpdater::new(
            EmailProfileProvider::new(store),
            Arc::new(FakeApi::default()),
        );
        assert!(updater.set_identifier("a@x.com", None).await.is_err());
    }
}
