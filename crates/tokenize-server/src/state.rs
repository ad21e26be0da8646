//! Application State

use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Immutable server settings
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
