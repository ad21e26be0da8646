//! Cross-Frame Message Protocol
//!
//! Plain JSON objects discriminated by `status` or `type`. There is no
//! versioning and no signature; anything that does not match a known shape
//! is dropped by [`CallbackMessage::parse`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw message as delivered to the host window
#[derive(Clone, Debug, PartialEq)]
pub struct InboundMessage {
    /// `MessageEvent.origin` of the sender
    pub origin: String,
    pub data: Value,
}

impl InboundMessage {
    pub fn new(origin: impl Into<String>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

/// Terminal payment outcome reported by the frame
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRedirect {
    pub redirect_url: String,
    pub success: bool,
    pub merchant_reference: Option<String>,
    pub response_code: Option<String>,
}

/// Recognized inbound messages
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackMessage {
    /// In-frame script is listening for stylesheets
    Ready,

    /// In-frame script applied the stylesheet
    InjectionSucceeded,

    /// In-frame script failed to apply the stylesheet
    InjectionFailed { reason: String },

    /// Payment finished; the host must navigate
    PaymentRedirect(PaymentRedirect),
}

impl CallbackMessage {
    /// Classify a message by shape, `None` for unrelated traffic
    pub fn parse(data: &Value) -> Option<Self> {
        let obj = data.as_object()?;

        if let Some(status) = obj.get("status").and_then(Value::as_str) {
            return match status {
                "ready" => Some(CallbackMessage::Ready),
                "css_injected" if obj.get("success").and_then(Value::as_bool) == Some(true) => {
                    Some(CallbackMessage::InjectionSucceeded)
                }
                "css_injection_failed" => Some(CallbackMessage::InjectionFailed {
                    reason: obj
                        .get("error")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown error")
                        .to_string(),
                }),
                _ => None,
            };
        }

        let is_redirect = obj.get("type").and_then(Value::as_str) == Some("payment_callback")
            && obj.get("action").and_then(Value::as_str) == Some("redirect");
        if !is_redirect {
            return None;
        }

        let redirect_url = obj.get("redirectUrl").and_then(Value::as_str)?;
        Some(CallbackMessage::PaymentRedirect(PaymentRedirect {
            redirect_url: redirect_url.to_string(),
            success: obj.get("success").and_then(Value::as_bool).unwrap_or(false),
            merchant_reference: text_field(obj.get("merchantReference")),
            response_code: text_field(obj.get("responseCode")),
        }))
    }
}

// Gateways send response codes as either strings or numbers
fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Messages the host posts into the frame
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum OutboundMessage {
    #[serde(rename = "injectCss")]
    InjectCss { css: String },
}
