//! recipe-book server.
//!
//! Startup: `.env` → configuration → logging → database connection → routes →
//! listen. Shutdown: SIGTERM/Ctrl-C → drain connections → close the database.

use anyhow::{Context, Result};
use recipe_book::{config, routes, AppContext, Config, Server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = config::load_dotenv();
    let config = Config::from_env()?;
    init_tracing(&config.rust_log);
    dotenv.log();

    let masked_uri = config.mongodb_uri_masked();
    info!(
        storage = %config.storage,
        mongodb_uri = masked_uri.as_deref().unwrap_or("-"),
        port = config.port,
        "configuration loaded"
    );

    let addr = config.socket_addr()?;
    let ctx = AppContext::connect(&config)
        .await
        .context("Failed to connect to the recipe store")?;

    Server::bind(addr)
        .serve(routes::router(ctx.clone()))
        .await
        .context("Server error")?;

    ctx.shutdown().await;
    info!("shutdown complete");
    Ok(())
}

/// `RUST_LOG` from the environment wins; otherwise the configured default.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
