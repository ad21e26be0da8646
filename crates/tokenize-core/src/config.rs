//! Tokenization Configuration

use std::time::Duration;

/// Frame name the hidden form targets
pub const DEFAULT_FRAME_NAME: &str = "paymentFrame";

/// Same-site page that forwards the form into the gateway
pub const DEFAULT_PROXY_FORM_PATH: &str = "/payfort-custom-form.html";

/// Style injection attempts before giving up
pub const DEFAULT_MAX_INJECTION_ATTEMPTS: u32 = 10;

/// Controller and backend client settings
#[derive(Clone, Debug)]
pub struct TokenizeConfig {
    /// Backend base URL (without the `/api/...` path)
    pub api_base_url: String,

    /// Backend request timeout (native builds only)
    pub request_timeout: Duration,

    /// Action of the hidden form
    pub proxy_form_path: String,

    /// Name of the embedded frame
    pub frame_name: String,

    /// Delay between rendering the hidden form and submitting it
    pub submit_delay: Duration,

    /// Style injection retry period
    pub poll_interval: Duration,

    /// Style injection retry budget
    pub max_injection_attempts: u32,

    /// Origin of the host page, trusted for in-frame script messages
    pub host_origin: Option<String>,
}

impl Default for TokenizeConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".into(),
            request_timeout: Duration::from_secs(30),
            proxy_form_path: DEFAULT_PROXY_FORM_PATH.into(),
            frame_name: DEFAULT_FRAME_NAME.into(),
            submit_delay: Duration::from_millis(100),
            poll_interval: Duration::from_secs(1),
            max_injection_attempts: DEFAULT_MAX_INJECTION_ATTEMPTS,
            host_origin: None,
        }
    }
}

impl TokenizeConfig {
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("TOKENIZATION_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".into());
        let request_timeout = std::env::var("TOKENIZATION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));
        let host_origin = std::env::var("TOKENIZATION_HOST_ORIGIN").ok();

        Self {
            api_base_url,
            request_timeout,
            host_origin,
            ..Default::default()
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_host_origin(mut self, origin: impl Into<String>) -> Self {
        self.host_origin = Some(origin.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full tokenization endpoint URL
    pub fn tokenization_endpoint(&self) -> String {
        format!(
            "{}/api/tokenization/request-tokenization",
            self.api_base_url.trim_end_matches('/')
        )
    }
}
