use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use telegate::config::Config;
use telegate::server::{self, AppState};
use telegate::telegram::TelegramGateway;

#[derive(Parser)]
#[command(name = "telegate")]
#[command(author, version, about = "HTTP gateway for a Telegram user session")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{err:#}");
            std::process::exit(1);
        }
    };

    let gateway = match TelegramGateway::connect(&config).await {
        Ok(gateway) => gateway,
        Err(err) => {
            error!("Failed to initialize Telegram client: {err:#}");
            std::process::exit(1);
        }
    };
    info!("Telegram client initialized successfully");

    let state = AppState {
        api_key: config.api_key.clone(),
        messenger: Arc::new(gateway),
    };

    server::run(&cli.bind, cli.port, state).await
}
