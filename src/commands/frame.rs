//! Headless remote frame bootstrap.
//!
//! Runs the frame lifecycle without a browser: the init options come from a
//! JSON file, the host window is simulated by [`HeadlessHost`], and the host
//! page side of the handshake is a [`HostPort`] that connects immediately.
//!
//! ```bash
//! pushsync frame options.json --parent
//! pushsync frame options.json --opener --subscribe
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::frame::{
    EnvironmentInfo, FrameServices, FrameState, HostPort, HostWindow, LocalMessenger,
    PushRegistrar, RemoteFrame, SdkContext, WorkerMessenger,
};
use crate::store::Store;

/// Simulated browser window.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    /// Pretend the frame was opened as a popup.
    pub opener: bool,
    /// Pretend the frame is embedded in a parent page.
    pub parent: bool,
}

impl HostWindow for HeadlessHost {
    fn has_opener(&self) -> bool {
        self.opener
    }

    fn has_parent(&self) -> bool {
        self.parent
    }

    fn write_error(&self, html: &str) {
        eprintln!("{}", html);
    }

    fn close(&self) {
        log::info!("[Frame] Window closed");
    }

    fn environment_info(&self) -> EnvironmentInfo {
        EnvironmentInfo {
            browser_type: "headless".to_string(),
            browser_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            is_https: true,
            supports_push: false,
        }
    }
}

/// Worker messenger that only logs.
#[derive(Debug, Default)]
pub struct LoggingWorker;

impl WorkerMessenger for LoggingWorker {
    fn listen(&self, listen_for_page_messages: bool) {
        log::debug!(
            "[Frame] Worker listener started (page messages: {})",
            listen_for_page_messages
        );
    }
}

/// Registrar that records push as enabled in the store.
///
/// There is no permission prompt outside a browser.
pub struct StoreRegistrar {
    store: Arc<dyn Store>,
}

impl StoreRegistrar {
    /// Registrar writing to `store`.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PushRegistrar for StoreRegistrar {
    async fn register_for_push(&self) -> Result<()> {
        log::info!("[Frame] Registering for push");
        self.store.set_push_enabled(true)
    }
}

impl std::fmt::Debug for StoreRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreRegistrar").finish_non_exhaustive()
    }
}

/// Build a headless frame from raw options plus the host port that drives it.
pub fn build(
    raw_options: &serde_json::Value,
    host: HeadlessHost,
    store: Arc<dyn Store>,
) -> Result<(RemoteFrame, HostPort)> {
    let (messenger, port) = LocalMessenger::pair();
    let services = FrameServices {
        host: Arc::new(host),
        messenger: Box::new(messenger),
        worker_messenger: Arc::new(LoggingWorker),
        registrar: Arc::new(StoreRegistrar::new(Arc::clone(&store))),
        store,
    };
    let frame = RemoteFrame::from_raw(raw_options, services).context("Invalid frame options")?;
    Ok((frame, port))
}

/// Bootstrap a frame, connect from the host side and optionally subscribe.
///
/// Returns the SDK context, or `None` when the frame refused to initialize
/// because it had neither an opener nor a parent.
pub async fn run(
    raw_options: &serde_json::Value,
    host: HeadlessHost,
    store: Arc<dyn Store>,
    subscribe: bool,
) -> Result<Option<Arc<SdkContext>>> {
    let (mut frame, port) = build(raw_options, host, store)?;

    let connector = tokio::spawn(async move {
        if let Err(e) = port.connect().await {
            log::warn!("[Frame] Host connect failed: {:#}", e);
        }
        port
    });

    let context = frame.initialize().await?;
    // Keep the port alive until initialization finished
    let _port = connector.await.context("Host connect task panicked")?;

    if frame.state() == FrameState::Initialized && subscribe {
        frame.subscribe().await?;
    }
    frame.dispose();
    Ok(context)
}

/// Load options from `path` and run the frame, printing the resulting config.
pub async fn run_file(
    path: &Path,
    host: HeadlessHost,
    store: Arc<dyn Store>,
    subscribe: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))?;

    match run(&raw, host, store, subscribe).await? {
        Some(context) => println!("{}", serde_json::to_string_pretty(&context.config)?),
        None => anyhow::bail!("Frame refused to initialize"),
    }
    Ok(())
}
