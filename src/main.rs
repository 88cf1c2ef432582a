//! Star notifier - Discord webhook notifications for called shooting stars.
//!
//! The notifier polls a stars API, keeps the active stars that landed on a
//! known location, and relays them to Discord webhooks:
//!
//! - a **listing** message per webhook, edited in place with every active star
//! - a temporary **new star** message per webhook when stars appear, mentioning
//!   an optional role and deleted once older than `NEW_STAR_MESSAGE_MAX_AGE`
//!
//! # Configuration
//!
//! Settings come from environment variables, optionally on top of a YAML
//! file given with `--config`. See the [`config`] module for every key.
//!
//! ```bash
//! export STARS_API_URL="https://stars.example.com/api/stars"
//! export DISCORD_WEBHOOK_URLS="https://discord.com/api/webhooks/1/abc=1234"
//! star-notifier --data ./data
//! ```
//!
//! # Architecture
//!
//! - [`stars`] - Stars API client, filtering and new star detection
//! - [`discord`] - Webhook client and message payloads
//! - [`notifications`] - Listing, new star messages, sweeping and persisted state
//! - [`thumbnails`] - Location thumbnails attached to the listing
//! - [`notifier`] - Polling loop
//! - [`config`] - Layered configuration
//! - [`utils`] - Path and time helpers
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use tokio::signal;

use crate::{config::Config, notifier::Notifier};

mod config;
mod discord;
mod notifications;
mod notifier;
mod stars;
mod thumbnails;
mod utils;

/// Command-line arguments of the star notifier.
///
/// ```bash
/// star-notifier --config config.yaml --data ./data
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to an optional YAML configuration file.
    ///
    /// Environment variables override values of the file.
    #[arg(short, long)]
    config: Option<String>,

    /// Directory of the state file, overrides `DATABASE_DIRECTORY`.
    #[arg(short, long)]
    data: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting star-notifier {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loads the configuration and state, then polls until a fatal error or
/// Ctrl-C. The state is saved once more before returning.
async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(data) = args.data {
        config.database_directory = data;
    }
    info!("configuration: {}", config);

    let mut notifier = Notifier::from_config(&config)
        .await
        .context("failed to initialize notifier")?;

    let outcome = tokio::select! {
        result = notifier.run() => result,
        signal = signal::ctrl_c() => {
            signal.context("failed to listen for shutdown signal")?;
            info!("shutdown requested");
            Ok(())
        }
    };

    let saved = notifier.save().await;
    outcome?;
    saved.context("failed to save state")?;
    info!("state saved to {}", config.state_path());

    Ok(())
}
