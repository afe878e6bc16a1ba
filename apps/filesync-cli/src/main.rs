//! `filesync` command-line client.

mod cli;
mod commands;
mod config;
mod progress;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use commands::Session;
use config::ClientConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let session = Session {
        config: ClientConfig::load()?,
        server: cli.server,
    };
    commands::run(cli.command, session).await
}
