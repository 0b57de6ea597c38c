//! pushsync - secondary channel synchronization for a web push SDK.
//!
//! This crate keeps a user's identity and tag state consistent across the
//! primary push channel and secondary channels (email), and bootstraps the
//! embedded remote frame that relays messages to a host page.
//!
//! # Architecture
//!
//! ```text
//! ChannelSynchronizer ──► EmailChannel ──► updaters ──► PlayerApi (REST)
//!                                 │
//!                                 └──► Store (device subscription, email profile)
//!
//! RemoteFrame ──► FrameInitOptions ──► SdkContext (owned, no globals)
//!      │
//!      └──► FrameMessenger ──► HandshakeHandle::resolve()
//! ```
//!
//! # Modules
//!
//! - [`api`] - Player REST API client
//! - [`channel`] - Secondary channels and the synchronizer
//! - [`commands`] - CLI subcommand implementations
//! - [`frame`] - Remote frame bootstrap
//! - [`store`] - Persisted local state
//! - [`config`] - Configuration loading/saving

pub mod api;
pub mod channel;
pub mod commands;
pub mod frame;
pub mod store;

pub mod config;
pub mod constants;
pub mod env;
pub mod models;

// Re-export commonly used types
pub use api::{ApiClient, PlayerApi};
pub use channel::{ChannelEvents, ChannelSynchronizer, EmailChannel, SecondaryChannel};
pub use config::Config;
pub use frame::{FrameInitOptions, RemoteFrame, SdkContext};
pub use models::{AppConfig, ChannelProfile, DeviceSubscription, Tags};
pub use store::{FileStore, MemoryStore, Store};
