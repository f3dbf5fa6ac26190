//! Photobooth CLI - photo submission service with an asynchronous derivative
//! pipeline.
//!
//! Submitted photos are queued and turned into 75%, 50% and 25% JPEG
//! derivatives by a background worker. The HTTP API serves any rendition
//! back by record identifier.
//!
//! # Usage
//!
//! ```bash
//! # API and worker in one process (in-memory backends)
//! photobooth run
//!
//! # Split roles over Redis and PostgreSQL
//! photobooth serve
//! photobooth consume
//!
//! # Send a file to a running server
//! photobooth submit photo.jpg
//!
//! # View configuration
//! photobooth config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;
mod server;

use cli::run::Role;

/// Photobooth - photo submission service with an asynchronous derivative pipeline.
#[derive(Parser, Debug)]
#[command(name = "photobooth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "PHOTOBOOTH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API (producer)
    Serve,

    /// Run the pipeline worker (consumer)
    Consume,

    /// Serve the HTTP API and run the worker in one process
    Run,

    /// Submit an image file to a running server
    Submit(cli::submit::SubmitArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

impl Commands {
    /// Serving and consuming must never run on fallback backends.
    fn is_long_running(&self) -> bool {
        matches!(self, Commands::Serve | Commands::Consume | Commands::Run)
    }
}

/// A broken config file is fatal for long-running roles; one-shot commands
/// fall back to defaults with a warning.
fn resolve_config(
    loaded: Result<photobooth_core::Config, photobooth_core::ConfigError>,
    strict: bool,
) -> anyhow::Result<photobooth_core::Config> {
    match loaded {
        Ok(config) => Ok(config),
        Err(e) if strict => Err(anyhow::anyhow!(e).context(format!(
            "Failed to load config from {}",
            photobooth_core::Config::default_path().display()
        ))),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `photobooth config path`."
            );
            Ok(photobooth_core::Config::default())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => photobooth_core::Config::load_from(path)?,
        None => resolve_config(photobooth_core::Config::load(), cli.command.is_long_running())?,
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Photobooth v{}", photobooth_core::VERSION);

    match cli.command {
        Commands::Serve => cli::run::execute(config, Role::Serve).await,
        Commands::Consume => cli::run::execute(config, Role::Consume).await,
        Commands::Run => cli::run::execute(config, Role::All).await,
        Commands::Submit(args) => cli::submit::execute(args).await,
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref()).await,
    }
}
