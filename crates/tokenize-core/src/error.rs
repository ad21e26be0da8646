//! Error Types

use thiserror::Error;

/// Result type alias for tokenization operations
pub type Result<T> = std::result::Result<T, TokenizeError>;

/// Tokenization session errors
#[derive(Error, Debug)]
pub enum TokenizeError {
    /// Payment request failed validation before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network failure or timeout talking to the backend
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned HTTP {status}: {body}")]
    BackendStatus { status: u16, body: String },

    /// Backend answered 200 but the body is unusable
    #[error("Malformed tokenization response: {0}")]
    MalformedResponse(String),

    /// Backend or gateway rejected the tokenization
    #[error("Tokenization rejected: {0}")]
    Rejected(String),

    /// Completion arrived for a session that has since been replaced
    #[error("Session is no longer current")]
    StaleSession,

    /// Operation needs an active session
    #[error("No active session")]
    NoActiveSession,

    /// Cross-frame message could not be posted
    #[error("Messaging error: {0}")]
    Messaging(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TokenizeError {
    /// Check if resubmitting the form may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            TokenizeError::Transport(_) => true,
            TokenizeError::BackendStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Message shown in the inline alert
    pub fn user_message(&self) -> String {
        match self {
            TokenizeError::Validation(msg) => msg.clone(),
            TokenizeError::Transport(e) if e.is_timeout() => {
                "The payment service did not respond in time. Please try again.".into()
            }
            TokenizeError::Transport(e) => format!("Error initiating payment: {}", e),
            TokenizeError::BackendStatus { .. } | TokenizeError::MalformedResponse(_) => {
                "Failed to get tokenization form data from API".into()
            }
            TokenizeError::Rejected(msg) => format!("Tokenization failed. {}", msg),
            TokenizeError::Config(_) => "Payment service configuration error.".into(),
            _ => "An unexpected error occurred. Please start a new payment.".into(),
        }
    }
}

/// Why the frame's document could not be styled directly
///
/// Never shown to users; the retrier falls back to messaging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameAccessError {
    #[error("frame has no document yet")]
    NotLoaded,

    #[error("frame document is cross-origin")]
    CrossOrigin,

    #[error("DOM error: {0}")]
    Dom(String),
}
