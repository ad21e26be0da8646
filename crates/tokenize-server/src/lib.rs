//! tokenize-server
//!
//! Serves the WASM front-end, the same-site proxy page the payment frame
//! loads first, the in-frame style injector, and (for local development) a
//! stand-in tokenization backend.

pub mod config;
pub mod handlers;
pub mod pages;
pub mod state;

use std::path::Path;

use axum::{routing::{get, post}, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::handlers::{health_check, mock_tokenization, proxy_form, style_injector_script};
use crate::state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let static_dir = Path::new(&state.config.static_dir);
    // Client-side routes (/payment-test, /order-details/..) fall back to the SPA shell
    let frontend = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/payfort-custom-form.html", get(proxy_form))
        .route("/payfort-style-injector.js", get(style_injector_script))
        .route("/api/tokenization/request-tokenization", post(mock_tokenization))
        .fallback_service(frontend)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
