//! Payment Sessions
//!
//! The editable payment request, and the immutable session created from it
//! when the user starts a tokenization attempt.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TokenizeError};

/// Merchant reference, unique per tokenization attempt
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MerchantReference(String);

impl MerchantReference {
    /// Generate `TEST-YYYYMMDDHHMMSS` from a timestamp
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self(format!("TEST-{}", now.format("%Y%m%d%H%M%S")))
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for MerchantReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hosted page language
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "ar" => Language::Ar,
            _ => Language::En,
        }
    }
}

/// Visual theme applied to the frame container and injected stylesheet
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    #[serde(rename = "theme-light")]
    Light,
    #[serde(rename = "theme-dark")]
    Dark,
}

impl Theme {
    /// CSS class on the iframe container
    pub fn css_class(&self) -> &'static str {
        match self {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "theme-dark" | "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

/// Editable payment request backing the input form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub merchant_reference: MerchantReference,
    pub amount: Decimal,
    pub currency: String,
    pub customer_email: String,
    pub customer_name: String,
    pub order_description: String,
    pub language: Language,
    pub theme: Theme,
}

impl PaymentRequest {
    /// Request with demo defaults and the given reference
    pub fn new(merchant_reference: MerchantReference) -> Self {
        Self {
            merchant_reference,
            amount: dec!(100),
            currency: "AED".into(),
            customer_email: "test@example.com".into(),
            customer_name: "Test Customer".into(),
            order_description: "Test Order".into(),
            language: Language::En,
            theme: Theme::Light,
        }
    }

    /// Check the fields the backend requires
    pub fn validate(&self) -> Result<()> {
        if self.merchant_reference.is_empty() {
            return Err(TokenizeError::Validation("Merchant reference is required".into()));
        }
        if self.amount <= Decimal::ZERO {
            return Err(TokenizeError::Validation("Amount must be greater than zero".into()));
        }
        let email = self.customer_email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(TokenizeError::Validation("A valid customer email is required".into()));
        }
        Ok(())
    }
}

/// Identifies one session; every timer and async completion carries it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionTicket(u64);

impl SessionTicket {
    pub(crate) fn first() -> Self {
        Self(0)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// One tokenization attempt, frozen at submit time
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub merchant_reference: MerchantReference,
    pub amount: Decimal,
    pub currency: String,
    pub customer_email: String,
    pub language: Language,
    pub theme: Theme,
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Freeze a validated request into a session
    pub fn from_request(request: &PaymentRequest, started_at: DateTime<Utc>) -> Result<Self> {
        request.validate()?;
        Ok(Self {
            merchant_reference: request.merchant_reference.clone(),
            amount: request.amount,
            currency: request.currency.clone(),
            customer_email: request.customer_email.trim().to_string(),
            language: request.language,
            theme: request.theme,
            started_at,
        })
    }
}
