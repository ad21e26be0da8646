//! HTTP Handlers

use std::collections::BTreeMap;

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use tokenize_core::backend::TokenizationRequest;
use tokenize_core::form::TokenizationApiResponse;

use crate::pages::{render_proxy_page, STYLE_INJECTOR_JS};
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub mock_tokenization: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        mock_tokenization: state.config.mock_tokenization,
    })
}

/// Same-site page that forwards the hidden form into the gateway
pub async fn proxy_form(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, ApiError> {
    let params: Vec<(String, String)> = url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .into_owned()
        .collect();

    render_proxy_page(&params, &state.config.gateway_form_method)
        .map(Html)
        .map_err(|e| {
            tracing::warn!(error = %e, "Rejected proxy page request");
            api_error(StatusCode::BAD_REQUEST, e.to_string(), e.code())
        })
}

/// Script loaded by the proxy page inside the frame
pub async fn style_injector_script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        STYLE_INJECTOR_JS,
    )
}

/// Development stand-in for the tokenization backend
///
/// The signature is a placeholder; the real backend signs with the
/// merchant's gateway credentials. `return_url` points at a path this
/// server does not route, so a gateway that honours it lands on the SPA
/// shell inside the frame; the real backend owns that endpoint.
pub async fn mock_tokenization(
    State(state): State<AppState>,
    Json(payload): Json<TokenizationRequest>,
) -> Result<Json<TokenizationApiResponse>, ApiError> {
    let config = &state.config;
    if !config.mock_tokenization {
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Mock tokenization not enabled",
            "MOCK_DISABLED",
        ));
    }

    if payload.viva_order_id.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "vivaOrderId is required", "INVALID_REQUEST"));
    }
    if payload.amount.is_zero() || payload.amount.is_sign_negative() {
        return Err(api_error(StatusCode::BAD_REQUEST, "amount must be positive", "INVALID_REQUEST"));
    }

    tracing::info!(
        merchant_reference = %payload.viva_order_id,
        pan_order_id = %payload.pan_order_id,
        amount = %payload.amount,
        currency = %payload.currency,
        "Mock tokenization request"
    );

    let return_url = format!(
        "{}/api/tokenization/return",
        config.public_base_url.trim_end_matches('/')
    );
    let params: BTreeMap<String, Value> = [
        ("service_command", "TOKENIZATION".to_string()),
        ("access_code", "mock-access-code".to_string()),
        ("merchant_identifier", "mock-merchant".to_string()),
        ("merchant_reference", payload.viva_order_id.clone()),
        ("language", payload.language.clone()),
        ("signature", format!("unsigned-{}", payload.pan_order_id)),
        ("merchant_extra", payload.pan_order_id.clone()),
        ("return_url", return_url),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), Value::String(value)))
    .collect();

    Ok(Json(TokenizationApiResponse {
        action_url: Some(config.mock_gateway_url.clone()),
        form_parameters: Some(params),
    }))
}
