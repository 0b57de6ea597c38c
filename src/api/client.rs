//! API client for the player REST endpoints.
//!
//! This module provides the [`ApiClient`] struct which handles all HTTP
//! communication with the player API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::types::{
    CreatePlayerResponse, EmailLogoutRequest, EmailPlayerRecord, FocusPayload, PlayerUpdate,
    PlayerUpdateRequest, SuccessResponse,
};
use super::PlayerApi;
use crate::constants;
use crate::models::{AppConfig, ChannelProfile};

/// API client for the player REST API.
///
/// Encapsulates HTTP client configuration. Reuse one instance for
/// connection pooling.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    api_url: String,
}

impl ApiClient {
    /// Creates a new API client for `api_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(constants::HTTP_REQUEST_TIMEOUT)
            .build()?;

        Ok(Self::with_client(client, api_url))
    }

    /// Creates an API client with a pre-configured HTTP client.
    ///
    /// Useful for testing or when custom client configuration is needed.
    pub fn with_client(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the API base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn player_url(&self, player_id: &str) -> String {
        format!("{}/players/{}", self.api_url, player_id)
    }
}

#[async_trait]
impl PlayerApi for ApiClient {
    async fn create_email_player(&self, record: &EmailPlayerRecord) -> Result<Option<String>> {
        let url = format!("{}/players", self.api_url);
        log::debug!("Creating email player at {}", url);

        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .context("Create player request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to create email player ({status}): {body}");
        }

        let created: CreatePlayerResponse = response
            .json()
            .await
            .context("Invalid create player response")?;
        Ok(created.id)
    }

    async fn update_player(
        &self,
        app_id: &str,
        player_id: &str,
        update: &PlayerUpdate,
    ) -> Result<bool> {
        let url = self.player_url(player_id);
        let body = PlayerUpdateRequest { app_id, update };

        let response = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .context("Update player request failed")?;

        let status = response.status();
        if status.is_success() {
            log::debug!("Updated player {}", player_id);
            Ok(true)
        } else {
            log::warn!(
                "Player update rejected: {} - {}",
                status,
                response.text().await.unwrap_or_default()
            );
            Ok(false)
        }
    }

    async fn logout_email(
        &self,
        app_config: &AppConfig,
        profile: &ChannelProfile,
        device_id: &str,
    ) -> Result<bool> {
        let email_id = profile
            .subscription_id
            .as_deref()
            .context("Email profile has no subscription id")?;
        let url = format!("{}/email_logout", self.player_url(email_id));

        let body = EmailLogoutRequest {
            app_id: &app_config.app_id,
            parent_player_id: device_id,
            identifier_auth_hash: profile.identifier_auth_hash.as_deref(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Email logout request failed")?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Email logout rejected: {}", status);
            return Ok(false);
        }

        let result: SuccessResponse = response
            .json()
            .await
            .context("Invalid email logout response")?;
        Ok(result.success)
    }

    async fn on_session(&self, player_id: &str, record: &EmailPlayerRecord) -> Result<()> {
        let url = format!("{}/on_session", self.player_url(player_id));

        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .context("on_session request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("on_session failed for {}: {}", player_id, response.status());
        }
        Ok(())
    }

    async fn on_focus(&self, player_id: &str, payload: &FocusPayload) -> Result<()> {
        let url = format!("{}/on_focus", self.player_url(player_id));

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .context("on_focus request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("on_focus failed for {}: {}", player_id, response.status());
        }
        Ok(())
    }
}
