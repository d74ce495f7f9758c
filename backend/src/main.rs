use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{info, Level};

mod config;
mod error;
mod files;
mod routes;

use config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    let level = if config.is_development() {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;

    info!("Starting portfolio server");
    info!("URL: http://{}", addr);
    info!(
        "Debug mode: {}",
        if config.is_development() { "enabled" } else { "disabled" }
    );
    info!("Serving files from {}", config.site_root.display());

    let app = routes::router(Arc::new(config));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("server error")?;
    Ok(())
}
