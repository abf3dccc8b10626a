//! eventbook server entry point.
//!
//! Starts the Axum HTTP server with the event and booking endpoints.

use tracing_subscriber::EnvFilter;

use eventbook::app_state::AppState;
use eventbook::config::AppConfig;
use eventbook::{build_app, build_store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        storage = config.storage.as_str(),
        "starting eventbook"
    );

    // Build persistence and service layers
    let store = build_store(&config)?;
    let app_state = AppState::new(store, config.storage);

    // Build router
    let app = build_app(app_state, &config);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
