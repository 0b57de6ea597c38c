//! Lifecycle broadcasts to every registered channel.
//!
//! ```bash
//! pushsync session
//! pushsync focus 42
//! pushsync tags plan=pro region=eu
//! pushsync external-id user-123 --auth-hash <hmac>
//! ```

use anyhow::{Context, Result};

use super::Services;
use crate::models::Tags;

/// Broadcast a new session.
pub async fn session(services: &Services) -> Result<()> {
    services.synchronizer.on_session().await?;
    println!("Session sent to {} channel(s)", services.synchronizer.channel_count());
    Ok(())
}

/// Broadcast `duration_secs` of active time.
pub async fn focus(services: &Services, duration_secs: u64) -> Result<()> {
    services.synchronizer.on_focus(duration_secs).await?;
    println!("Focus time {}s sent", duration_secs);
    Ok(())
}

/// Broadcast tags given as `key=value` pairs.
pub async fn tags(services: &Services, pairs: &[String]) -> Result<()> {
    let tags = parse_tags(pairs)?;
    services.synchronizer.set_tags(&tags).await?;
    println!("{} tag(s) sent", tags.len());
    Ok(())
}

/// Record the auth hash, then broadcast an external user id.
///
/// The stored hash is what a later email relink sends to the push record.
pub async fn external_id(services: &Services, id: &str, auth_hash: Option<&str>) -> Result<()> {
    services
        .store
        .set_external_user_id_auth_hash(auth_hash.map(str::to_string))?;
    services.synchronizer.set_external_user_id(id, auth_hash).await?;
    println!("External user id sent");
    Ok(())
}

/// Parse `key=value` pairs. An empty value (`key=`) deletes the tag remotely.
pub fn parse_tags(pairs: &[String]) -> Result<Tags> {
    pairs
        .iter()
        .map(|pair| {
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("Tag '{}' is not in key=value form", pair))?;
            let key = key.trim();
            if key.is_empty() {
                anyhow::bail!("Tag '{}' has an empty key", pair);
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PlayerUpdate;
    use crate::channel::updaters::test_support::{ApiCall, FakeApi};
    use crate::channel::SecondaryChannel;
    use crate::config::Config;
    use crate::models::DeviceSubscription;
    use crate::store::{MemoryStore, Store};
    use std::sync::Arc;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_tags() {
        let tags = parse_tags(&strings(&["plan=pro", "region=eu=west", "old="])).unwrap();
        assert_eq!(tags.len(), 3);
        assert_eq!(tags["plan"], "pro");
        assert_eq!(tags["region"], "eu=west");
        assert_eq!(tags["old"], "");
    }

    #[test]
    fn test_parse_tags_rejects_malformed() {
        assert!(parse_tags(&strings(&["plan"])).is_err());
        assert!(parse_tags(&strings(&["=pro"])).is_err());
    }

    #[tokio::test]
    async fn test_external_id_hash_reaches_email_relink() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_device_subscription(DeviceSubscription {
                device_id: Some("device-1".to_string()),
                ..DeviceSubscription::default()
            })
            .unwrap();
        let api = Arc::new(FakeApi::default());
        let config = Config {
            app_id: Some("app-1".to_string()),
            ..Config::default()
        };
        let services = Services::with_parts(&config, store.clone(), api.clone()).unwrap();

        external_id(&services, "user-1", Some("ext-hash")).await.unwrap();
        assert_eq!(
            store.external_user_id_auth_hash().unwrap().as_deref(),
            Some("ext-hash")
        );

        services
            .email
            .set_identifier("a@x.com", None)
            .await
            .unwrap();

        let relink = api
            .calls()
            .into_iter()
            .find_map(|call| match call {
                ApiCall::Update {
                    player_id, update, ..
                } if player_id == "device-1" => Some(update),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            relink,
            PlayerUpdate {
                parent_player_id: Some("email-new".to_string()),
                email: Some("a@x.com".to_string()),
                external_user_id_auth_hash: Some("ext-hash".to_string()),
                ..PlayerUpdate::default()
            }
        );
    }

    #[tokio::test]
    async fn test_external_id_without_hash_clears_stored_hash() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_external_user_id_auth_hash(Some("old".to_string()))
            .unwrap();
        let services =
            Services::with_parts(&Config::default(), store.clone(), Arc::new(FakeApi::default()))
                .unwrap();

        external_id(&services, "user-1", None).await.unwrap();

        assert!(store.external_user_id_auth_hash().unwrap().is_none());
    }
}
