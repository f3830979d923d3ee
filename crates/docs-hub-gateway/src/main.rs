//! Docs Hub - HTTP gateway over S3-compatible storage

use anyhow::Context;
use clap::Parser;
use docs_hub_gateway::{run_server, AppConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "docs-hub")]
#[command(about = "HTTP gateway for documents kept in S3-compatible storage")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "./configs/production.toml", env = "DOCS_HUB_CONFIG")]
    config: PathBuf,

    /// Skip the configuration file and read DOCS_HUB_* variables only
    #[arg(short = 'e', long)]
    from_env: bool,

    /// Load a .env file before reading the environment
    #[arg(short = 'j', long)]
    with_dotenv: bool,

    /// Use in-memory storage (for testing, data will not persist)
    #[arg(long, env = "DOCS_HUB_MEMORY_STORE")]
    memory_store: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.with_dotenv {
        dotenvy::dotenv().ok();
    }

    let file = (!args.from_env).then_some(args.config.as_path());
    let mut config = AppConfig::load(file)
        .with_context(|| format!("failed to load configuration from {}", args.config.display()))?;
    if args.memory_store {
        config.cloud.use_memory_store = true;
    }

    init_tracing(&config, args.debug);

    tracing::info!(
        address = %config.server.address,
        cloud = %config.cloud.endpoint_url(),
        "Starting Docs Hub gateway"
    );

    run_server(config).await
}

fn init_tracing(config: &AppConfig, debug: bool) {
    let level = if debug {
        "debug"
    } else {
        config.server.logger_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "docs_hub_gateway={level},docs_hub_storage={level},docs_hub={level},tower_http={level}"
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
