//! Application-wide constants for pushsync.
//!
//! Centralizes magic numbers and wire-level values so they can be found in
//! one place. Constants are grouped by domain.
//!
//! # Categories
//!
//! - **Timeouts**: Network timeouts
//! - **API**: Player REST API defaults and device types
//! - **Frame**: Remote frame bootstrap values

use std::time::Duration;

// ============================================================================
// Timeouts
// ============================================================================

/// HTTP client request timeout for player API calls.
///
/// Applies to each individual request. Nothing in this crate retries, so a
/// request that times out is reported as a failure to the caller.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// API
// ============================================================================

/// Default base URL of the player REST API.
pub const DEFAULT_API_URL: &str = "https://onesignal.com/api/v1";

/// Device type the player API assigns to email records.
pub const DEVICE_TYPE_EMAIL: u32 = 11;

/// `type` field sent with focus (active time) updates.
pub const FOCUS_UPDATE_TYPE: u32 = 1;

/// `state` field sent with focus (active time) updates.
pub const FOCUS_UPDATE_STATE: &str = "ping";

// ============================================================================
// Frame
// ============================================================================

/// Message written into the frame when it is opened without an opener or parent.
pub const FRAME_DIRECT_OPEN_MESSAGE: &str = "<span style='font-size: 14px; color: red; font-family: sans-serif;'>\
pushsync: This page cannot be directly opened, and must be opened as a result of a subscription call.</span>";

/// Buffer size for the in-process host/frame message queue.
pub const FRAME_MESSAGE_BUFFER: usize = 32;
