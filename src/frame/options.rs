//! Frame init options.
//!
//! The embedding page passes plain untyped values. [`FrameInitOptions::from_raw`]
//! is the only way to build typed options and rejects missing or malformed
//! required fields instead of passing them through.

use serde::Serialize;
use serde_json::Value;

/// Errors from validating raw frame init options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOptionsError {
    /// The init record was not a JSON object.
    NotAnObject,
    /// A required field was absent or null.
    Missing(&'static str),
    /// A field was present but unusable.
    Invalid {
        /// Raw field name.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

impl std::fmt::Display for FrameOptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "Frame init options must be an object"),
            Self::Missing(field) => write!(f, "Missing required frame option '{field}'"),
            Self::Invalid { field, reason } => {
                write!(f, "Invalid frame option '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for FrameOptionsError {}

/// Metrics reporting settings. The frame never reports metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsOptions {
    /// Whether metrics are enabled.
    pub enable: bool,
    /// Reporting token, when enabled.
    pub mixpanel_reporting_token: Option<String>,
}

/// Validated frame init options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameInitOptions {
    /// Application id (UUID, lowercase hyphenated).
    pub app_id: String,
    /// Subdomain hosting the frame.
    pub subdomain: String,
    /// Site URL from the dashboard config.
    pub origin: String,
    /// Human-readable site name.
    pub site_name: String,
    /// Legacy flag: the user already pressed "continue".
    pub continue_pressed: bool,
    /// Legacy flag: opened as a popup.
    pub is_popup: bool,
    /// Legacy flag: opened as a modal.
    pub is_modal: bool,
    /// Metrics settings (always disabled).
    pub metrics: MetricsOptions,
}

impl FrameInitOptions {
    /// Validate the raw init record `{appId, subdomainName, origin, siteName,
    /// continuePressed?, isPopup?, isModal?}`.
    pub fn from_raw(raw: &Value) -> Result<Self, FrameOptionsError> {
        let obj = raw.as_object().ok_or(FrameOptionsError::NotAnObject)?;

        let app_id_raw = required_string(obj, "appId")?;
        let app_id = uuid::Uuid::parse_str(&app_id_raw)
            .map_err(|e| FrameOptionsError::Invalid {
                field: "appId",
                reason: e.to_string(),
            })?
            .hyphenated()
            .to_string();

        let subdomain = required_string(obj, "subdomainName")?;
        let origin = parse_origin(&required_string(obj, "origin")?)?;
        let site_name = required_string(obj, "siteName")?;

        Ok(Self {
            app_id,
            subdomain,
            origin,
            site_name,
            continue_pressed: optional_flag(obj, "continuePressed")?,
            is_popup: optional_flag(obj, "isPopup")?,
            is_modal: optional_flag(obj, "isModal")?,
            metrics: MetricsOptions::default(),
        })
    }
}

type RawObject = serde_json::Map<String, Value>;

fn required_string(obj: &RawObject, field: &'static str) -> Result<String, FrameOptionsError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(FrameOptionsError::Missing(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(FrameOptionsError::Invalid {
            field,
            reason: "must not be empty".to_string(),
        }),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(FrameOptionsError::Invalid {
            field,
            reason: format!("expected a string, got {other}"),
        }),
    }
}

fn optional_flag(obj: &RawObject, field: &'static str) -> Result<bool, FrameOptionsError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) => match s.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            other => Err(FrameOptionsError::Invalid {
                field,
                reason: format!("expected a boolean, got \"{other}\""),
            }),
        },
        Some(Value::Number(n)) => match n.as_u64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(FrameOptionsError::Invalid {
                field,
                reason: format!("expected a boolean, got {n}"),
            }),
        },
        Some(other) => Err(FrameOptionsError::Invalid {
            field,
            reason: format!("expected a boolean, got {other}"),
        }),
    }
}

/// Normalize an http(s) origin to `scheme://host[:port]`.
fn parse_origin(raw: &str) -> Result<String, FrameOptionsError> {
    let parsed = url::Url::parse(raw).map_err(|e| FrameOptionsError::Invalid {
        field: "origin",
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(FrameOptionsError::Invalid {
            field: "origin",
            reason: format!("expected an http(s) URL, got \"{raw}\""),
        });
    }
    Ok(parsed.origin().ascii_serialization())
}
