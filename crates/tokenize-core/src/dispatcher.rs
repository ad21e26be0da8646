//! Callback Dispatcher
//!
//! Routes inbound cross-frame messages to the retrier or to navigation.
//! Only messages from the active session's origins are accepted, and a
//! redirect naming another merchant reference is rejected.

use url::Url;

use crate::form::TokenizationFormData;
use crate::injection::{FrameDocument, StyleInjector, TickOutcome};
use crate::message::{CallbackMessage, InboundMessage};
use crate::messenger::Messenger;
use crate::session::{MerchantReference, SessionTicket};

/// Result of handling one inbound message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Unrelated traffic, or no session is active
    Ignored,
    /// Recognized but refused (unknown origin, foreign merchant reference)
    Rejected(String),
    /// Forwarded to the style injector
    Injection(TickOutcome),
    /// Terminal: the host navigates here
    Navigate(String),
}

/// What the dispatcher trusts for the current session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionGuard {
    pub ticket: SessionTicket,
    pub merchant_reference: MerchantReference,
    pub allowed_origins: Vec<String>,
}

impl SessionGuard {
    /// Trust the host page plus the gateway and return-page origins
    pub fn new(
        ticket: SessionTicket,
        merchant_reference: MerchantReference,
        form: &TokenizationFormData,
        host_origin: Option<&str>,
    ) -> Self {
        let mut allowed_origins: Vec<String> = Vec::new();
        let candidates = [host_origin, Some(form.action_url.as_str()), Some(form.return_url.as_str())];

        for origin in candidates.into_iter().flatten().filter_map(origin_of) {
            if !allowed_origins.contains(&origin) {
                allowed_origins.push(origin);
            }
        }

        Self {
            ticket,
            merchant_reference,
            allowed_origins,
        }
    }

    pub fn accepts_origin(&self, origin: &str) -> bool {
        origin_of(origin).is_some_and(|o| self.allowed_origins.contains(&o))
    }
}

/// ASCII serialization of a URL's origin, `None` for opaque or invalid URLs
fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let origin = parsed.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Stateless message router
pub struct CallbackDispatcher;

impl CallbackDispatcher {
    pub fn dispatch(
        message: &InboundMessage,
        guard: Option<&SessionGuard>,
        injector: &mut StyleInjector,
        frame: &dyn FrameDocument,
        messenger: &dyn Messenger,
    ) -> Dispatch {
        let Some(callback) = CallbackMessage::parse(&message.data) else {
            return Dispatch::Ignored;
        };

        let Some(guard) = guard else {
            tracing::debug!(origin = %message.origin, "Callback with no active session dropped");
            return Dispatch::Ignored;
        };

        if !guard.accepts_origin(&message.origin) {
            tracing::warn!(
                origin = %message.origin,
                merchant_reference = %guard.merchant_reference,
                "Rejected callback from untrusted origin"
            );
            return Dispatch::Rejected(format!("untrusted origin {}", message.origin));
        }

        match callback {
            CallbackMessage::Ready => Dispatch::Injection(injector.on_ready(frame, messenger)),
            CallbackMessage::InjectionSucceeded => Dispatch::Injection(injector.on_injection_succeeded()),
            CallbackMessage::InjectionFailed { reason } => {
                Dispatch::Injection(injector.on_injection_failed(&reason))
            }
            CallbackMessage::PaymentRedirect(redirect) => {
                let foreign = redirect
                    .merchant_reference
                    .as_deref()
                    .filter(|r| *r != guard.merchant_reference.as_str());
                if let Some(reference) = foreign {
                    tracing::warn!(
                        received = reference,
                        expected = %guard.merchant_reference,
                        "Rejected redirect for another session"
                    );
                    return Dispatch::Rejected(format!("merchant reference {} is not current", reference));
                }

                tracing::info!(
                    success = redirect.success,
                    response_code = ?redirect.response_code,
                    redirect_url = %redirect.redirect_url,
                    "Payment completed"
                );
                Dispatch::Navigate(redirect.redirect_url)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FrameAccessError, Result};
    use crate::message::OutboundMessage;
    use crate::injection::InjectionPhase;
    use serde_json::json;

    struct CrossOriginFrame;

    impl FrameDocument for CrossOriginFrame {
        fn inject_style(&self, _css: &str) -> std::result::Result<(), FrameAccessError> {
            Err(FrameAccessError::CrossOrigin)
        }
    }

    struct NullMessenger;

    impl Messenger for NullMessenger {
        fn send(&self, _message: &OutboundMessage) -> Result<()> {
            Ok(())
        }
    }

    fn guard() -> SessionGuard {
        let form = TokenizationFormData {
            action_url: "https://gw.example/tokenize".into(),
            return_url: "https://api.example/api/tokenization/return".into(),
            service_command: String::new(),
            access_code: String::new(),
            merchant_identifier: String::new(),
            merchant_reference: "TEST-1".into(),
            language: "en".into(),
            token_name: String::new(),
            signature: String::new(),
            merchant_extra: String::new(),
            extra: Default::default(),
        };
        SessionGuard::new(
            SessionTicket::first(),
            MerchantReference::from_string("TEST-1"),
            &form,
            Some("http://localhost:3000"),
        )
    }

    fn dispatch(origin: &str, data: serde_json::Value, guard: Option<&SessionGuard>) -> (Dispatch, StyleInjector) {
        let mut injector = StyleInjector::new("body{}");
        injector.frame_loaded();
        let message = InboundMessage::new(origin, data);
        let result = CallbackDispatcher::dispatch(&message, guard, &mut injector, &CrossOriginFrame, &NullMessenger);
        (result, injector)
    }

    #[test]
    fn test_guard_origins() {
        let guard = guard();
        assert_eq!(
            guard.allowed_origins,
            ["http://localhost:3000", "https://gw.example", "https://api.example"]
        );
        assert!(guard.accepts_origin("https://gw.example"));
        assert!(!guard.accepts_origin("https://evil.example"));
        assert!(!guard.accepts_origin("null"));
    }

    #[test]
    fn test_redirect_navigates() {
        let guard = guard();
        let (result, _) = dispatch(
            "https://api.example",
            json!({"type": "payment_callback", "action": "redirect",
                   "redirectUrl": "/order-details/TEST-1", "success": true,
                   "merchantReference": "TEST-1"}),
            Some(&guard),
        );
        assert_eq!(result, Dispatch::Navigate("/order-details/TEST-1".into()));
    }

    #[test]
    fn test_foreign_reference_rejected() {
        let guard = guard();
        let (result, _) = dispatch(
            "https://api.example",
            json!({"type": "payment_callback", "action": "redirect",
                   "redirectUrl": "/order-details/TEST-OLD", "success": true,
                   "merchantReference": "TEST-OLD"}),
            Some(&guard),
        );
        assert!(matches!(result, Dispatch::Rejected(_)));
    }

    #[test]
    fn test_untrusted_origin_rejected() {
        let guard = guard();
        let (result, injector) = dispatch(
            "https://evil.example",
            json!({"status": "css_injected", "success": true}),
            Some(&guard),
        );
        assert!(matches!(result, Dispatch::Rejected(_)));
        assert_eq!(injector.phase(), InjectionPhase::Polling);
    }

    #[test]
    fn test_redirect_from_untrusted_origin_rejected() {
        let guard = guard();
        let (result, _) = dispatch(
            "https://evil.example",
            json!({"type": "payment_callback", "action": "redirect",
                   "redirectUrl": "/order-details/TEST-1", "success": true,
                   "merchantReference": "TEST-1"}),
            Some(&guard),
        );
        assert!(matches!(result, Dispatch::Rejected(_)));
        assert!(!matches!(result, Dispatch::Navigate(_)));
    }

    #[test]
    fn test_injection_messages_routed() {
        let guard = guard();
        let (result, injector) = dispatch(
            "http://localhost:3000",
            json!({"status": "css_injected", "success": true}),
            Some(&guard),
        );
        assert_eq!(result, Dispatch::Injection(TickOutcome::Injected));
        assert!(injector.state().injected);

        let (result, injector) = dispatch(
            "http://localhost:3000",
            json!({"status": "css_injection_failed", "error": "no head"}),
            Some(&guard),
        );
        assert_eq!(result, Dispatch::Injection(TickOutcome::Requested { attempt: 1 }));
        assert_eq!(injector.state().attempts, 1);
    }

    #[test]
    fn test_no_session_or_unknown_shape_ignored() {
        let (result, _) = dispatch("http://localhost:3000", json!({"status": "ready"}), None);
        assert_eq!(result, Dispatch::Ignored);

        let guard = guard();
        let (result, _) = dispatch("http://localhost:3000", json!({"hello": "world"}), Some(&guard));
        assert_eq!(result, Dispatch::Ignored);
    }
}
