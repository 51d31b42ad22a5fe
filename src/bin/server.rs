//! Coastwatch HTTP Server Binary
//!
//! This is the main entry point for the Coastwatch REST API server.
//! It initializes the repository, sets up the HTTP router, and starts
//! serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the local (in-memory) repository (default)
//! cargo run --bin coastwatch-server --features "local-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: Storage backend (default: local)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use coastwatch::db::RepositoryFactory;
use coastwatch::http::{create_router, AppState};
use coastwatch::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting Coastwatch HTTP Server");

    // Resolve configuration: file first, then environment overrides
    let settings = Settings::load().map_err(|e| anyhow::anyhow!(e))?;

    // Create the repository for the configured backend
    let repository = RepositoryFactory::from_env().map_err(|e| anyhow::anyhow!(e))?;
    info!("Repository initialized successfully");

    // Determine bind address before settings move into the shared state
    let addr: SocketAddr =
        format!("{}:{}", settings.server.host, settings.server.port).parse()?;

    // Create application state and router
    let state = AppState::new(repository, settings);
    let app = create_router(state);

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
