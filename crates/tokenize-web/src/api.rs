//! Backend Wiring

use std::sync::Arc;

use tokenize_core::{AppRoute, HttpTokenizationClient, TokenizationBackend, TokenizeConfig};

/// Controller settings for this page
///
/// The backend URL is fixed at build time (`TOKENIZATION_API_BASE_URL`);
/// the host origin comes from the current location.
pub fn tokenize_config() -> TokenizeConfig {
    let mut config = TokenizeConfig::default();
    if let Some(base_url) = option_env!("TOKENIZATION_API_BASE_URL") {
        config = config.with_api_base_url(base_url);
    }
    if let Some(origin) = window_origin() {
        config = config.with_host_origin(origin);
    }
    config
}

/// HTTP backend client for `config`
pub fn backend(config: &TokenizeConfig) -> tokenize_core::Result<Arc<dyn TokenizationBackend>> {
    let client = HttpTokenizationClient::from_config(config)?;
    Ok(Arc::new(client))
}

pub fn window_origin() -> Option<String> {
    web_sys::window().and_then(|w| w.location().origin().ok())
}

/// Route for the current location
pub fn current_route(pathname: &str, search: &str) -> AppRoute {
    let search = search.trim_start_matches('?');
    if search.is_empty() {
        AppRoute::parse(pathname)
    } else {
        AppRoute::parse(&format!("{pathname}?{search}"))
    }
}

/// Full-page navigation
pub fn redirect(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(path) {
            tracing::warn!(path, error = ?e, "Navigation failed");
        }
    }
}
