//! Configuration loading and persistence.
//!
//! Handles reading and writing the pushsync configuration file and applying
//! `PUSHSYNC_*` environment overrides on top of it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::{fs, path::PathBuf};

use crate::constants;

/// File name of the persisted local state inside the config directory.
const STATE_FILE_NAME: &str = "state.json";

/// Configuration for the pushsync CLI.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    /// Base URL of the player REST API.
    pub api_url: String,
    /// Application id used when no app config has been persisted yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Explicit location of the local state file. Defaults to
    /// `{config_dir}/state.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: constants::DEFAULT_API_URL.to_string(),
            app_id: None,
            state_file: None,
        }
    }
}

impl Config {
    /// Returns the configuration directory path, creating it if necessary.
    ///
    /// Directory selection priority:
    /// 1. `#[cfg(test)]` (unit tests): `tmp/pushsync-test`
    /// 2. `PUSHSYNC_CONFIG_DIR` env var: explicit override
    /// 3. `PUSHSYNC_ENV=test`: `tmp/pushsync-test` (integration tests)
    /// 4. Default: platform config dir (macOS: ~/Library/Application Support/pushsync)
    pub fn config_dir() -> Result<PathBuf> {
        let dir = {
            #[cfg(test)]
            {
                PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tmp/pushsync-test")
            }

            #[cfg(not(test))]
            {
                if let Ok(dir) = std::env::var("PUSHSYNC_CONFIG_DIR") {
                    PathBuf::from(dir)
                } else if crate::env::is_any_test() {
                    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tmp/pushsync-test")
                } else {
                    dirs::config_dir()
                        .context("Could not determine config directory")?
                        .join("pushsync")
                }
            }
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
        Ok(dir)
    }

    /// Loads configuration from file, with environment variable overrides.
    ///
    /// A missing or unreadable config file falls back to defaults.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_file().unwrap_or_else(|e| {
            log::debug!("Using default config: {e:#}");
            Self::default()
        });
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_from_file() -> Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");
        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            anyhow::bail!("Config file not found")
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(api_url) = std::env::var("PUSHSYNC_API_URL") {
            self.api_url = api_url;
        }

        if let Ok(app_id) = std::env::var("PUSHSYNC_APP_ID") {
            if !app_id.is_empty() {
                self.app_id = Some(app_id);
            }
        }

        if let Ok(state_file) = std::env::var("PUSHSYNC_STATE_FILE") {
            self.state_file = Some(PathBuf::from(state_file));
        }
    }

    /// Persists the current configuration to disk.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_dir()?.join("config.json");
        fs::write(&config_path, serde_json::to_string_pretty(self)?)?;

        // Owner read/write only
        #[cfg(unix)]
        fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600))?;

        Ok(())
    }

    /// Resolve the local state file location.
    pub fn state_path(&self) -> Result<PathBuf> {
        match &self.state_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(STATE_FILE_NAME)),
        }
    }

    /// Set a single key by name (used by `pushsync config <key> <value>`).
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => self.api_url = value.to_string(),
            "app_id" => self.app_id = (!value.is_empty()).then(|| value.to_string()),
            "state_file" => {
                self.state_file = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            other => anyhow::bail!("Unknown config key '{other}'"),
        }
        Ok(())
    }
}
