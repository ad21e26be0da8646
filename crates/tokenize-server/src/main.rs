//! tokenize-server
//!
//! Axum server for the hosted tokenization demo.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tokenize_server::{app, config::ServerConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();

    if config.mock_tokenization {
        tracing::info!("✓ Mock tokenization enabled");
        tracing::info!("  Gateway page: {}", config.mock_gateway_url);
    } else {
        tracing::warn!("⚠ Mock tokenization disabled - front-end needs a real backend");
        tracing::warn!("  Set MOCK_TOKENIZATION=true in .env for local testing");
    }

    if !std::path::Path::new(&config.static_dir).is_dir() {
        tracing::warn!("⚠ Static directory '{}' not found - build the front-end first", config.static_dir);
    }

    let addr = config.bind_addr.clone();
    let state = AppState::new(config);
    let router = app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 tokenize-server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                     - Health check");
    tracing::info!("  GET  /payfort-custom-form.html   - Frame proxy page");
    tracing::info!("  GET  /payfort-style-injector.js  - In-frame style injector");
    tracing::info!("  POST /api/tokenization/request-tokenization - Mock backend");
    tracing::info!("");

    axum::serve(listener, router).await?;

    Ok(())
}
