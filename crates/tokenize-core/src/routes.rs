//! Navigation Targets
//!
//! Pages hand order and error state to each other through the URL. Path
//! segments win over query parameters.

use chrono::{DateTime, Utc};
use url::form_urlencoded;

/// Routable pages
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppRoute {
    Home,
    PaymentTest { order_id: Option<String> },
    OrderDetails { order_id: Option<String>, card_last4: Option<String> },
    PaymentFailed { error_code: Option<String>, order_id: Option<String> },
    NotFound,
}

impl AppRoute {
    /// Parse a path with optional query string
    pub fn parse(path_and_query: &str) -> Self {
        let (path, query) = path_and_query
            .split_once('?')
            .unwrap_or((path_and_query, ""));
        let query_param = |key: &str| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
                .filter(|v| !v.is_empty())
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let segment = |i: usize| segments.get(i).map(|s| (*s).to_string());

        match segments.first().copied() {
            None => AppRoute::Home,
            Some("payment-test") if segments.len() == 1 => AppRoute::PaymentTest {
                order_id: query_param("orderId"),
            },
            Some("order-details") if segments.len() <= 2 => AppRoute::OrderDetails {
                order_id: segment(1).or_else(|| query_param("orderId")),
                card_last4: query_param("cardLast4"),
            },
            Some("payment-failed") if segments.len() <= 3 => AppRoute::PaymentFailed {
                error_code: segment(1).or_else(|| query_param("error")),
                order_id: segment(2).or_else(|| query_param("orderId")),
            },
            _ => AppRoute::NotFound,
        }
    }

    /// Canonical path for this route
    pub fn to_path(&self) -> String {
        match self {
            AppRoute::Home => "/".into(),
            AppRoute::PaymentTest { order_id: None } => "/payment-test".into(),
            AppRoute::PaymentTest { order_id: Some(id) } => {
                format!("/payment-test?orderId={}", encode(id))
            }
            AppRoute::OrderDetails { order_id, card_last4 } => {
                let mut path = match order_id {
                    Some(id) => format!("/order-details/{}", encode(id)),
                    None => "/order-details".into(),
                };
                if let Some(last4) = card_last4 {
                    path.push_str(&format!("?cardLast4={}", encode(last4)));
                }
                path
            }
            AppRoute::PaymentFailed { error_code, order_id } => match (error_code, order_id) {
                (Some(code), Some(id)) => format!("/payment-failed/{}/{}", encode(code), encode(id)),
                (Some(code), None) => format!("/payment-failed/{}", encode(code)),
                (None, Some(id)) => format!("/payment-failed?orderId={}", encode(id)),
                (None, None) => "/payment-failed".into(),
            },
            AppRoute::NotFound => "/404".into(),
        }
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Link back into the payment page, reusing the order id
pub fn retry_path(order_id: Option<&str>) -> String {
    AppRoute::PaymentTest {
        order_id: order_id.map(str::to_string),
    }
    .to_path()
}

/// Explanation for a gateway failure code
pub fn failure_message(error_code: Option<&str>) -> &'static str {
    match error_code {
        Some("01") => "Insufficient funds. Please check your account balance.",
        Some("02") => "Card declined by issuer. Please try a different card.",
        Some("03") => "Invalid card details. Please check your card information.",
        Some("04") => "Card expired. Please use a valid card.",
        Some("05") => "Transaction limit exceeded. Please contact your bank.",
        Some("06") => "Network error. Please try again in a few moments.",
        Some("07") => "Card blocked. Please contact your bank.",
        Some("08") => "Invalid CVV. Please check your card security code.",
        _ => "An unexpected error occurred during payment processing. Please try again or contact support.",
    }
}

/// Order id for a details page reached without one: `ORD-YYYYMMDD-NNNN`
pub fn generate_order_id(now: DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().as_u128() % 9000 + 1000;
    format!("ORD-{}-{}", now.format("%Y%m%d"), suffix)
}
