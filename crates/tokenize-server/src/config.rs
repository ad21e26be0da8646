//! Server Configuration

/// Server settings, read from the environment (`.env` supported)
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// Built WASM front-end
    pub static_dir: String,

    /// Serve the development tokenization endpoint
    pub mock_tokenization: bool,

    /// Hosted page the mock endpoint points the frame at
    pub mock_gateway_url: String,

    /// Externally visible base URL, used for the mock return URL
    pub public_base_url: String,

    /// Method the proxy page uses to reach the gateway
    pub gateway_form_method: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            static_dir: "static".into(),
            mock_tokenization: false,
            mock_gateway_url: "https://sbcheckout.payfort.com/FortAPI/paymentPage".into(),
            public_base_url: "http://localhost:3000".into(),
            gateway_form_method: "post".into(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |key: &str, default: String| std::env::var(key).unwrap_or(default);

        let mock_tokenization = std::env::var("MOCK_TOKENIZATION")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let gateway_form_method = match var("GATEWAY_FORM_METHOD", defaults.gateway_form_method).to_lowercase().as_str() {
            "get" => "get".to_string(),
            _ => "post".to_string(),
        };

        Self {
            bind_addr: var("BIND_ADDR", defaults.bind_addr),
            static_dir: var("STATIC_DIR", defaults.static_dir),
            mock_tokenization,
            mock_gateway_url: var("MOCK_GATEWAY_URL", defaults.mock_gateway_url),
            public_base_url: var("PUBLIC_BASE_URL", defaults.public_base_url),
            gateway_form_method,
        }
    }
}
