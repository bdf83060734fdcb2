use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ridepool::cli::{Cli, Commands};
use ridepool::config::Config;
use ridepool::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config)?;
    if let Some(api_url) = &cli.api_url {
        config.api.base_url = api_url.clone();
    }

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let ctx = AppContext::new(config)?;

    // Settle the stored credential before dispatching, except for commands
    // that replace or discard the session anyway.
    match cli.command {
        Commands::Login { .. } | Commands::Register { .. } | Commands::Logout => {}
        _ => {
            ctx.auth.resolve().await;
        }
    }

    ridepool::cli::run_command(&cli, &ctx).await
}
