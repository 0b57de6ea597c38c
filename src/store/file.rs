//! JSON file [`Store`] implementation.
//!
//! The whole [`StoreState`] lives in one file. Every write is a
//! read-modify-write under a process-wide mutex so two handles to the same
//! store in one process cannot interleave.

use anyhow::{Context, Result};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{Store, StoreState};
use crate::models::{AppConfig, ChannelProfile, DeviceSubscription};

/// Store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// The file is not touched until the first write; a missing file reads
    /// as an empty state.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full state from disk.
    pub fn load(&self) -> Result<StoreState> {
        let _guard = self.guard();
        self.read_state()
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn read_state(&self) -> Result<StoreState> {
        if !self.path.exists() {
            return Ok(StoreState::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(StoreState::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Corrupted state file {}", self.path.display()))
    }

    fn write_state(&self, state: &StoreState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create state directory")?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(state)?)
            .with_context(|| format!("Failed to write state file {}", self.path.display()))?;

        // Owner read/write only
        #[cfg(unix)]
        fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;

        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(StoreState) -> T) -> Result<T> {
        Ok(f(self.load()?))
    }

    fn update(&self, f: impl FnOnce(&mut StoreState)) -> Result<()> {
        let _guard = self.guard();
        let mut state = self.read_state()?;
        f(&mut state);
        self.write_state(&state)
    }
}

impl Store for FileStore {
    fn device_subscription(&self) -> Result<DeviceSubscription> {
        self.read(|s| s.subscription)
    }

    fn set_device_subscription(&self, subscription: DeviceSubscription) -> Result<()> {
        self.update(|s| s.subscription = subscription)
    }

    fn email_profile(&self) -> Result<ChannelProfile> {
        self.read(|s| s.email_profile)
    }

    fn set_email_profile(&self, profile: ChannelProfile) -> Result<()> {
        self.update(|s| s.email_profile = profile)
    }

    fn app_config(&self) -> Result<Option<AppConfig>> {
        self.read(|s| s.app_config)
    }

    fn set_app_config(&self, config: AppConfig) -> Result<()> {
        self.update(|s| s.app_config = Some(config))
    }

    fn external_user_id_auth_hash(&self) -> Result<Option<String>> {
        self.read(|s| s.external_user_id_auth_hash)
    }

    fn set_external_user_id_auth_hash(&self, hash: Option<String>) -> Result<()> {
        self.update(|s| s.external_user_id_auth_hash = hash)
    }

    fn is_push_enabled(&self) -> Result<bool> {
        self.read(|s| s.push_enabled)
    }

    fn set_push_enabled(&self, enabled: bool) -> Result<()> {
        self.update(|s| s.push_enabled = enabled)
    }
}
