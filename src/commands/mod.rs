//! CLI subcommand implementations for pushsync.
//!
//! Commands are organized into submodules by domain:
//!
//! - [`config`] - Read and write configuration keys
//! - [`device`] - Inspect or set the push device subscription
//! - [`email`] - Set or log out of the email channel
//! - [`events`] - Session, focus, tags and external user id broadcasts
//! - [`frame`] - Bootstrap a remote frame headlessly
//!
//! Every command that talks to the API goes through [`Services`], which wires
//! the store, API client and registered channels from a [`Config`].

pub mod config;
pub mod device;
pub mod email;
pub mod events;
pub mod frame;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::api::{ApiClient, PlayerApi};
use crate::channel::{ChannelSynchronizer, EmailChannel};
use crate::config::Config;
use crate::models::AppConfig;
use crate::store::{FileStore, Store};

/// Everything a command needs, wired from configuration.
pub struct Services {
    /// Persisted local state.
    pub store: Arc<dyn Store>,
    /// Player REST API.
    pub api: Arc<dyn PlayerApi>,
    /// Broadcasts to every registered channel.
    pub synchronizer: ChannelSynchronizer,
    /// The email channel (also registered with `synchronizer`).
    pub email: Arc<EmailChannel>,
}

impl Services {
    /// Wire services from `config`, backed by the file store at
    /// [`Config::state_path`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let state_path = config.state_path()?;
        log::debug!("Using state file {}", state_path.display());
        let store: Arc<dyn Store> = Arc::new(FileStore::open(state_path));
        let api: Arc<dyn PlayerApi> =
            Arc::new(ApiClient::new(&config.api_url).context("Failed to build API client")?);
        Self::with_parts(config, store, api)
    }

    /// Wire services over explicit store and API implementations.
    ///
    /// Seeds the stored app config from `config.app_id` when none has been
    /// persisted yet.
    pub fn with_parts(
        config: &Config,
        store: Arc<dyn Store>,
        api: Arc<dyn PlayerApi>,
    ) -> Result<Self> {
        if let Some(app_id) = &config.app_id {
            if store.app_config()?.is_none() {
                log::info!("Seeding app config for app {}", app_id);
                store.set_app_config(AppConfig::new(app_id.clone()))?;
            }
        }

        let mut synchronizer = ChannelSynchronizer::new();
        let email = EmailChannel::register(&mut synchronizer, Arc::clone(&store), Arc::clone(&api));

        Ok(Self {
            store,
            api,
            synchronizer,
            email,
        })
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("synchronizer", &self.synchronizer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::updaters::test_support::FakeApi;
    use crate::store::MemoryStore;

    #[test]
    fn test_with_parts_seeds_app_config() {
        let config = Config {
            app_id: Some("app-1".to_string()),
            ..Config::default()
        };
        let store = Arc::new(MemoryStore::new());
        let services =
            Services::with_parts(&config, store.clone(), Arc::new(FakeApi::default())).unwrap();

        assert_eq!(services.synchronizer.channel_count(), 1);
        assert_eq!(store.app_config().unwrap().unwrap().app_id, "app-1");
    }

    #[test]
    fn test_with_parts_keeps_existing_app_config() {
        let config = Config {
            app_id: Some("app-2".to_string()),
            ..Config::default()
        };
        let store = Arc::new(MemoryStore::new());
        store.set_app_config(AppConfig::new("app-1")).unwrap();

        Services::with_parts(&config, store.clone(), Arc::new(FakeApi::default())).unwrap();

        assert_eq!(store.app_config().unwrap().unwrap().app_id, "app-1");
    }
}
