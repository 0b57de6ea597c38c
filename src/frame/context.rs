//! SDK context built by the frame bootstrap.
//!
//! Everything the frame needs after initialization lives in one owned
//! [`SdkContext`] handed back to the caller, so no collaborator reads
//! ambient global state.

use serde::Serialize;
use std::sync::Arc;

use super::options::{FrameInitOptions, MetricsOptions};
use super::WorkerMessenger;
use crate::models::AppConfig;

/// Flattened string form of the init options, as the rest of the SDK expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SdkConfig {
    /// Application id.
    pub app_id: String,
    /// Subdomain; kept under both names because older readers use `subdomainName`.
    pub subdomain: String,
    /// Same value as `subdomain`.
    pub subdomain_name: String,
    /// Site origin.
    pub origin: String,
    /// Site name.
    pub site_name: String,
    /// Metrics settings.
    pub metrics: MetricsOptions,
    /// User-supplied config overrides (always empty for the frame).
    pub user_config: serde_json::Map<String, serde_json::Value>,
}

impl SdkConfig {
    /// Rasterize validated options.
    pub fn from_options(options: &FrameInitOptions) -> Self {
        Self {
            app_id: options.app_id.clone(),
            subdomain: options.subdomain.clone(),
            subdomain_name: options.subdomain.clone(),
            origin: options.origin.clone(),
            site_name: options.site_name.clone(),
            metrics: options.metrics.clone(),
            user_config: serde_json::Map::new(),
        }
    }

    /// App config derived from this SDK config.
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            app_id: self.app_id.clone(),
            subdomain: Some(self.subdomain.clone()),
            origin: Some(self.origin.clone()),
            site_name: Some(self.site_name.clone()),
        }
    }
}

/// Facts about the browser hosting the frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvironmentInfo {
    /// Browser family (e.g., "chrome").
    pub browser_type: String,
    /// Browser version string, if known.
    pub browser_version: Option<String>,
    /// Whether the frame is served over https.
    pub is_https: bool,
    /// Whether the browser supports push at all.
    pub supports_push: bool,
}

/// Owned SDK state available once the frame is initialized.
pub struct SdkContext {
    /// Rasterized init options.
    pub config: SdkConfig,
    /// App config (also persisted to the store).
    pub app_config: AppConfig,
    /// Host browser facts.
    pub environment: EnvironmentInfo,
    /// Listener for service worker messages.
    pub worker_messenger: Arc<dyn WorkerMessenger>,
}

impl std::fmt::Debug for SdkContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkContext")
            .field("config", &self.config)
            .field("app_config", &self.app_config)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}
