//! Proxwatch CLI - dashboard client for the cluster monitoring backend.

mod cli;
mod commands;
mod display;
mod watch;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use proxwatch_api::{ApiClient, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs stay out of command output unless RUST_LOG asks for them.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let mut config = Config::load();
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }

    let client = ApiClient::new(&config.api_url, config.request_timeout())
        .context("failed to build API client")?;

    match args.command {
        Commands::List { json } => commands::list(&client, json).await,
        Commands::Register {
            name,
            api_endpoint,
            username,
            password,
        } => commands::register(&client, name, api_endpoint, username, password).await,
        Commands::Show { id } => commands::show(&client, &id).await,
        Commands::Delete { id, yes } => commands::delete(&client, &id, yes).await,
        Commands::Disks { id } => commands::disks(&client, &id).await,
        Commands::Status { id, json } => commands::status(&client, &id, json).await,
        Commands::Watch { id, interval_secs } => {
            let period = match interval_secs {
                Some(secs) => Duration::from_secs(secs),
                None => config.effective_poll_interval(),
            };
            watch::run(client, id, period).await
        }
    }
}
