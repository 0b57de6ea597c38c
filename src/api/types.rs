//! Player API request/response types.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::models::Tags;

/// Email player record sent on create and on session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailPlayerRecord {
    /// Application id.
    pub app_id: String,
    /// Always [`constants::DEVICE_TYPE_EMAIL`].
    pub device_type: u32,
    /// Email address.
    pub identifier: String,
    /// Identity verification hash for the address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_auth_hash: Option<String>,
    /// Push player to link this email record to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_player_id: Option<String>,
}

impl EmailPlayerRecord {
    /// Record for `identifier` under `app_id`.
    pub fn new(app_id: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            device_type: constants::DEVICE_TYPE_EMAIL,
            identifier: identifier.into(),
            identifier_auth_hash: None,
            device_player_id: None,
        }
    }
}

/// Partial player update. Unset fields are left untouched on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerUpdate {
    /// Email player id the push record points back to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_player_id: Option<String>,
    /// Email address mirrored onto the push record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New identifier for an email record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Identity verification hash for `identifier`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_auth_hash: Option<String>,
    /// External user id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_user_id: Option<String>,
    /// Identity verification hash for the external user id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_user_id_auth_hash: Option<String>,
    /// Tags to merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

/// Body of a player update request: the update plus the app id.
#[derive(Debug, Serialize)]
pub(crate) struct PlayerUpdateRequest<'a> {
    pub app_id: &'a str,
    #[serde(flatten)]
    pub update: &'a PlayerUpdate,
}

/// Active-time report sent on focus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusPayload {
    /// Application id.
    pub app_id: String,
    /// Always [`constants::FOCUS_UPDATE_STATE`].
    pub state: String,
    /// Always [`constants::FOCUS_UPDATE_TYPE`].
    #[serde(rename = "type")]
    pub kind: u32,
    /// Seconds of active time being reported.
    pub active_time: u64,
    /// Device type of the player being reported.
    pub device_type: u32,
}

impl FocusPayload {
    /// Email focus report for `active_time` seconds.
    pub fn email(app_id: impl Into<String>, active_time: u64) -> Self {
        Self {
            app_id: app_id.into(),
            state: constants::FOCUS_UPDATE_STATE.to_string(),
            kind: constants::FOCUS_UPDATE_TYPE,
            active_time,
            device_type: constants::DEVICE_TYPE_EMAIL,
        }
    }
}

/// Body of an email logout request.
#[derive(Debug, Serialize)]
pub(crate) struct EmailLogoutRequest<'a> {
    pub app_id: &'a str,
    pub parent_player_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_auth_hash: Option<&'a str>,
}

/// Response to player creation.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatePlayerResponse {
    #[serde(default)]
    pub id: Option<String>,
}

/// Generic `{ "success": bool }` response.
#[derive(Debug, Deserialize)]
pub(crate) struct SuccessResponse {
    #[serde(default)]
    pub success: bool,
}
