// src/main.rs
//! Bridge gateway server entry point.

use anyhow::Result;
use clap::{Parser, Subcommand};
use nullbridge::api::server::GatewayServer;
use nullbridge::core::config::GatewayConfig;
use std::fs;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "nullbridge")]
#[command(about = "Cross-chain bridge gateway for MCP clients")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server
    Server {
        /// Port to bind the server to
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the effective configuration and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging()?;

    info!("Starting nullbridge v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config.toml: {}. Using default configuration", e);
        GatewayConfig::default()
    });

    if let Some(Commands::CheckConfig) = args.command {
        // credentials are serde(skip), so this never prints secrets
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    // Fail fast without provider credentials; every bridge call needs them.
    config.load_provider_credentials()?;

    if let Some(Commands::Server { port: Some(port) }) = args.command {
        config.server.port = port;
    }

    let server = GatewayServer::new(config)?;
    server.start().await?;

    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=info,h2=info"));

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Load gateway configuration from config.toml (or CONFIG_PATH).
fn load_config() -> Result<GatewayConfig> {
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config_content = fs::read_to_string(&config_path)?;
    let config = GatewayConfig::from_toml_str(&config_content)?;
    info!("Loaded configuration from {}", config_path);
    Ok(config)
}
