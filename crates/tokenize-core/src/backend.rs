//! Tokenization Backend
//!
//! The backend signs the gateway parameters; this crate only asks for them.
//! Hosts receive a [`TokenizationBackend`] at construction so tests can swap
//! the HTTP client for a stub.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::TokenizeConfig;
use crate::error::{Result, TokenizeError};
use crate::form::{TokenizationApiResponse, TokenizationFormData};
use crate::session::PaymentRequest;

/// Body of `POST /api/tokenization/request-tokenization`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizationRequest {
    pub viva_order_id: String,
    pub pan_order_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub customer_email: String,
    pub language: String,
}

impl TokenizationRequest {
    /// Build the wire request; `panOrderId` is fresh for every call
    pub fn from_payment(request: &PaymentRequest) -> Self {
        let currency = if request.currency.is_empty() {
            "AED".to_string()
        } else {
            request.currency.clone()
        };

        Self {
            viva_order_id: request.merchant_reference.as_str().to_string(),
            pan_order_id: uuid::Uuid::new_v4().to_string(),
            amount: request.amount,
            currency,
            customer_email: request.customer_email.trim().to_string(),
            language: request.language.as_str().to_string(),
        }
    }
}

/// Source of tokenization form data (Strategy pattern)
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TokenizationBackend {
    /// Request signed gateway parameters for a payment
    async fn request_tokenization(&self, request: &PaymentRequest) -> Result<TokenizationFormData>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// HTTP client for the tokenization backend
#[derive(Clone, Debug)]
pub struct HttpTokenizationClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTokenizationClient {
    /// Create a client for the given base URL with default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(&TokenizeConfig::default().with_api_base_url(base_url))
    }

    pub fn from_config(config: &TokenizeConfig) -> Result<Self> {
        #[cfg(not(target_arch = "wasm32"))]
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TokenizeError::Config(e.to_string()))?;

        // Browsers own the timeout on wasm
        #[cfg(target_arch = "wasm32")]
        let client = reqwest::Client::new();

        Ok(Self {
            client,
            endpoint: config.tokenization_endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TokenizationBackend for HttpTokenizationClient {
    async fn request_tokenization(&self, request: &PaymentRequest) -> Result<TokenizationFormData> {
        let body = TokenizationRequest::from_payment(request);

        tracing::info!(
            endpoint = %self.endpoint,
            merchant_reference = %request.merchant_reference,
            "Requesting tokenization form data"
        );

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();

        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Tokenization request failed");
            return Err(TokenizeError::BackendStatus {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let parsed: TokenizationApiResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(error = %e, "Tokenization response is not valid JSON");
            TokenizeError::MalformedResponse(e.to_string())
        })?;

        TokenizationFormData::from_response(parsed).inspect_err(|_| {
            tracing::warn!(body = %text, "Tokenization response has no form parameters");
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
