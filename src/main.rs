use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use blog_list_api::config::{AppConfig, Environment, StoreBackend};
use blog_list_api::state::AppState;

/// Blog list API server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Store backend: memory or postgres (overrides STORE_BACKEND)
    #[arg(long)]
    store: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    // Missing SECRET (or any other bad value) stops startup here
    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(store) = args.store.as_deref() {
        config.store.backend = store.parse::<StoreBackend>()?;
        config = config.validated()?;
    }

    let default_filter = match config.environment {
        Environment::Development => "info,blog_list_api=debug,tower_http=debug",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    tracing::info!("Starting Blog List API in {:?} mode", config.environment);
    tracing::debug!("Configuration: {:?}", config);

    let store = blog_list_api::database::connect(&config.store)
        .await
        .context("failed to open store")?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let app = blog_list_api::app(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Blog List API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
