//! pushsync CLI - drives the secondary channel synchronizer and the remote
//! frame bootstrap from the command line.
//!
//! This is the main binary entry point. See the `pushsync` library for the
//! core functionality.

use anyhow::Result;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use pushsync::commands::{self, Services};
use pushsync::Config;
use std::path::PathBuf;
use std::sync::Arc;

/// Global allocator configured per M-MIMALLOC-APPS guideline.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

// CLI
#[derive(Parser)]
#[command(name = "pushsync")]
#[command(version)]
#[command(about = "Keep secondary notification channels in sync with the push channel")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Email channel registration
    Email {
        #[command(subcommand)]
        action: EmailAction,
    },
    /// Show or set the push device id the email channel links to
    Device {
        /// New device id (empty string clears it)
        id: Option<String>,
    },
    /// Broadcast a new session to every channel
    Session,
    /// Broadcast active time to every channel
    Focus {
        /// Active time in seconds
        secs: u64,
    },
    /// Broadcast tags to every channel
    Tags {
        /// Tags as key=value pairs; an empty value deletes the tag
        #[arg(required = true)]
        pairs: Vec<String>,
    },
    /// Broadcast an external user id to every channel
    ExternalId {
        /// External user id
        id: String,
        /// Identity verification hash
        #[arg(long)]
        auth_hash: Option<String>,
    },
    /// Bootstrap a remote frame headlessly from a JSON options file
    Frame {
        /// Path to the init options JSON
        options: PathBuf,
        /// Simulate a popup (window has an opener)
        #[arg(long)]
        opener: bool,
        /// Simulate an embedded iframe (window has a parent)
        #[arg(long)]
        parent: bool,
        /// Subscribe once initialized
        #[arg(long)]
        subscribe: bool,
    },
    /// Show or set configuration
    Config {
        key: Option<String>,
        value: Option<String>,
    },
}

#[derive(Subcommand)]
enum EmailAction {
    /// Register an email address
    Set {
        /// Email address
        address: String,
        /// Identity verification hash
        #[arg(long)]
        auth_hash: Option<String>,
    },
    /// Log out of the email channel
    Logout,
}

fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Ok(path) = std::env::var("PUSHSYNC_LOG_FILE") {
        match std::fs::File::create(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Failed to create log file at {path}: {e}; logging to stderr"),
        }
    }
    builder.format_timestamp_secs().init();
}

fn services() -> Result<Services> {
    let config = Config::load()?;
    log::debug!(
        "Running against {} ({})",
        config.api_url,
        pushsync::env::Environment::current()
    );
    Services::from_config(&config)
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Email { action } => {
            let services = services()?;
            match action {
                EmailAction::Set { address, auth_hash } => {
                    commands::email::set(&services, &address, auth_hash.as_deref()).await?;
                }
                EmailAction::Logout => {
                    if !commands::email::logout(&services).await {
                        std::process::exit(1);
                    }
                }
            }
        }
        Commands::Device { id } => {
            let services = services()?;
            match id {
                Some(id) => {
                    commands::device::set(services.store.as_ref(), &id)?;
                }
                None => commands::device::show(services.store.as_ref())?,
            }
        }
        Commands::Session => commands::events::session(&services()?).await?,
        Commands::Focus { secs } => commands::events::focus(&services()?, secs).await?,
        Commands::Tags { pairs } => commands::events::tags(&services()?, &pairs).await?,
        Commands::ExternalId { id, auth_hash } => {
            commands::events::external_id(&services()?, &id, auth_hash.as_deref()).await?;
        }
        Commands::Frame {
            options,
            opener,
            parent,
            subscribe,
        } => {
            let services = services()?;
            let host = commands::frame::HeadlessHost { opener, parent };
            commands::frame::run_file(&options, host, Arc::clone(&services.store), subscribe)
                .await?;
        }
        Commands::Config { key, value } => {
            commands::config::run(key.as_deref(), value.as_deref())?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(cli.command))
}
