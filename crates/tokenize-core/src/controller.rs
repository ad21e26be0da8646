//! Tokenization Session Controller
//!
//! Owns one tokenization attempt at a time: validates the request, asks the
//! backend for gateway parameters, builds the hidden form that drives the
//! embedded frame, and feeds frame events to the retrier and dispatcher.
//!
//! Every session gets a fresh [`SessionTicket`]. Host timers and async
//! completions carry the ticket they were created with, and anything
//! holding a stale ticket is a no-op.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::backend::TokenizationBackend;
use crate::config::TokenizeConfig;
use crate::dispatcher::{CallbackDispatcher, Dispatch, SessionGuard};
use crate::error::{Result, TokenizeError};
use crate::form::{HiddenForm, TokenizationFormData};
use crate::injection::{FrameDocument, InjectionState, StyleInjector, TickOutcome};
use crate::message::InboundMessage;
use crate::messenger::Messenger;
use crate::session::{MerchantReference, PaymentRequest, Session, SessionTicket, Theme};
use crate::theme;

/// What the payment page shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ViewPhase {
    /// Editable order form
    #[default]
    Input,
    /// Waiting on the backend
    Loading,
    /// Frame and hidden form rendered
    FormVisible,
}

/// Render snapshot of the controller
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerView {
    pub phase: ViewPhase,
    pub error: Option<String>,
    pub hidden_form: Option<HiddenForm>,
    pub theme: Theme,
    pub request: PaymentRequest,
    pub injection: InjectionState,
}

/// A session waiting on the backend
#[derive(Clone, Debug)]
pub struct PendingSession {
    pub ticket: SessionTicket,
    pub request: PaymentRequest,
}

struct ActiveSession {
    session: Session,
    form: TokenizationFormData,
    hidden_form: HiddenForm,
    guard: SessionGuard,
    submitted: bool,
}

/// Session lifecycle owner
pub struct TokenizationController {
    backend: Arc<dyn TokenizationBackend>,
    config: TokenizeConfig,
    request: PaymentRequest,
    ticket: SessionTicket,
    phase: ViewPhase,
    pending: Option<Session>,
    active: Option<ActiveSession>,
    error: Option<String>,
    injector: StyleInjector,
}

impl TokenizationController {
    /// Create a controller; `existing_order_id` resumes a failed order
    pub fn new(
        backend: Arc<dyn TokenizationBackend>,
        config: TokenizeConfig,
        existing_order_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let reference = existing_order_id
            .filter(|id| !id.trim().is_empty())
            .map_or_else(|| MerchantReference::generate(now), MerchantReference::from_string);
        let request = PaymentRequest::new(reference);
        let injector = StyleInjector::with_max_attempts(
            theme::stylesheet(request.theme),
            config.max_injection_attempts,
        );

        Self {
            backend,
            config,
            request,
            ticket: SessionTicket::first(),
            phase: ViewPhase::Input,
            pending: None,
            active: None,
            error: None,
            injector,
        }
    }

    pub fn config(&self) -> &TokenizeConfig {
        &self.config
    }

    /// Backend handle, for hosts that await outside the controller borrow
    pub fn backend(&self) -> Arc<dyn TokenizationBackend> {
        Arc::clone(&self.backend)
    }

    pub fn request(&self) -> &PaymentRequest {
        &self.request
    }

    /// Edit the input form
    pub fn request_mut(&mut self) -> &mut PaymentRequest {
        &mut self.request
    }

    pub fn ticket(&self) -> SessionTicket {
        self.ticket
    }

    pub fn is_current(&self, ticket: SessionTicket) -> bool {
        self.ticket == ticket
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.active
            .as_ref()
            .map(|a| &a.session)
            .or(self.pending.as_ref())
    }

    pub fn form_data(&self) -> Option<&TokenizationFormData> {
        self.active.as_ref().map(|a| &a.form)
    }

    pub fn hidden_form(&self) -> Option<&HiddenForm> {
        self.active.as_ref().map(|a| &a.hidden_form)
    }

    pub fn injection_state(&self) -> InjectionState {
        self.injector.state()
    }

    pub fn view(&self) -> ControllerView {
        ControllerView {
            phase: self.phase,
            error: self.error.clone(),
            hidden_form: self.hidden_form().cloned(),
            theme: self.session().map_or(self.request.theme, |s| s.theme),
            request: self.request.clone(),
            injection: self.injector.state(),
        }
    }

    /// Validate and enter `Loading`; the caller then queries the backend
    pub fn begin_session(&mut self, now: DateTime<Utc>) -> Result<PendingSession> {
        self.teardown();

        let session = match Session::from_request(&self.request, now) {
            Ok(session) => session,
            Err(e) => {
                self.fail(&e);
                return Err(e);
            }
        };

        self.ticket = self.ticket.next();
        self.phase = ViewPhase::Loading;
        self.error = None;

        tracing::info!(
            merchant_reference = %session.merchant_reference,
            ticket = self.ticket.value(),
            "Tokenization session started"
        );
        self.pending = Some(session);

        Ok(PendingSession {
            ticket: self.ticket,
            request: self.request.clone(),
        })
    }

    /// Apply the backend result for `ticket`
    pub fn complete_session(
        &mut self,
        ticket: SessionTicket,
        result: Result<TokenizationFormData>,
    ) -> Result<&HiddenForm> {
        if ticket != self.ticket || self.pending.is_none() {
            tracing::debug!(ticket = ticket.value(), "Discarding stale tokenization result");
            return Err(TokenizeError::StaleSession);
        }
        let Some(session) = self.pending.take() else {
            return Err(TokenizeError::StaleSession);
        };

        let form = match result {
            Ok(form) => form,
            Err(e) => {
                self.fail(&e);
                return Err(e);
            }
        };

        let hidden_form = HiddenForm::build(&form, &self.config);
        let guard = SessionGuard::new(
            ticket,
            session.merchant_reference.clone(),
            &form,
            self.config.host_origin.as_deref(),
        );

        self.injector.set_stylesheet(theme::stylesheet(session.theme));
        self.injector.reset();
        self.phase = ViewPhase::FormVisible;

        tracing::info!(
            merchant_reference = %session.merchant_reference,
            "Tokenization form data received"
        );

        let active = self.active.insert(ActiveSession {
            session,
            form,
            hidden_form,
            guard,
            submitted: false,
        });
        Ok(&active.hidden_form)
    }

    /// `begin_session` + backend call + `complete_session`
    pub async fn start_session(&mut self) -> Result<&HiddenForm> {
        let pending = self.begin_session(Utc::now())?;
        let backend = self.backend();
        let result = backend.request_tokenization(&pending.request).await;
        self.complete_session(pending.ticket, result)
    }

    /// Claim the deferred form submission; true once per session
    pub fn mark_submitted(&mut self, ticket: SessionTicket) -> bool {
        if ticket != self.ticket {
            return false;
        }
        match self.active.as_mut() {
            Some(active) if !active.submitted => {
                active.submitted = true;
                true
            }
            _ => false,
        }
    }

    /// Embedded frame fired `load`
    pub fn frame_loaded(&mut self) {
        if self.active.is_some() {
            self.injector.frame_loaded();
        }
    }

    /// Retry timer tick for `ticket`
    pub fn poll_tick(
        &mut self,
        ticket: SessionTicket,
        frame: &dyn FrameDocument,
        messenger: &dyn Messenger,
    ) -> TickOutcome {
        if ticket != self.ticket || self.active.is_none() {
            return TickOutcome::Skipped;
        }
        self.injector.tick(frame, messenger)
    }

    /// Route an inbound cross-frame message
    pub fn handle_message(
        &mut self,
        message: &InboundMessage,
        frame: &dyn FrameDocument,
        messenger: &dyn Messenger,
    ) -> Dispatch {
        let guard = self.active.as_ref().map(|a| &a.guard);
        let dispatch = CallbackDispatcher::dispatch(message, guard, &mut self.injector, frame, messenger);

        if matches!(dispatch, Dispatch::Navigate(_)) {
            // Terminal: nothing tied to this session may fire again
            self.ticket = self.ticket.next();
            self.active = None;
            self.injector.reset();
        }
        dispatch
    }

    /// Drop form data, hide the frame, clear the error
    pub fn cancel_session(&mut self) {
        tracing::info!(ticket = self.ticket.value(), "Tokenization session cancelled");
        self.teardown();
        self.ticket = self.ticket.next();
        self.phase = ViewPhase::Input;
        self.error = None;
    }

    /// Cancel and prepare a fresh merchant reference
    pub fn restart_session(&mut self, now: DateTime<Utc>) {
        self.cancel_session();
        self.request.merchant_reference = MerchantReference::generate(now);
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn teardown(&mut self) {
        self.pending = None;
        self.active = None;
        self.injector.reset();
    }

    fn fail(&mut self, error: &TokenizeError) {
        tracing::warn!(
            merchant_reference = %self.request.merchant_reference,
            error = %error,
            "Tokenization session failed"
        );
        self.teardown();
        self.phase = ViewPhase::Input;
        self.error = Some(error.user_message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameAccessError;
    use crate::injection::InjectionPhase;
    use crate::message::OutboundMessage;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;
    use std::collections::BTreeMap;

    struct StaticBackend;

    #[async_trait]
    impl TokenizationBackend for StaticBackend {
        async fn request_tokenization(&self, request: &PaymentRequest) -> Result<TokenizationFormData> {
            Ok(form_for(request.merchant_reference.as_str()))
        }

        fn name(&self) -> &str {
            "static"
        }
    }

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

    fn form_for(reference: &str) -> TokenizationFormData {
        TokenizationFormData {
            action_url: "https://gw.example/tokenize".into(),
            service_command: "TOKENIZATION".into(),
            access_code: "code".into(),
            merchant_identifier: "merchant".into(),
            merchant_reference: reference.into(),
            language: "en".into(),
            token_name: String::new(),
            signature: "abc".into(),
            merchant_extra: String::new(),
            return_url: "https://api.example/return".into(),
            extra: BTreeMap::new(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn controller() -> TokenizationController {
        let config = TokenizeConfig::default().with_host_origin("http://localhost:3000");
        TokenizationController::new(Arc::new(StaticBackend), config, None, now())
    }

    #[test]
    fn test_new_generates_reference() {
        let controller = controller();
        assert_eq!(controller.request().merchant_reference.as_str(), "TEST-20240101120000");
        assert_eq!(controller.phase(), ViewPhase::Input);

        let resumed = TokenizationController::new(
            Arc::new(StaticBackend),
            TokenizeConfig::default(),
            Some("TEST-RETRY".into()),
            now(),
        );
        assert_eq!(resumed.request().merchant_reference.as_str(), "TEST-RETRY");
    }

    #[tokio::test]
    async fn test_start_session_shows_form() {
        let mut controller = controller();
        let form = controller.start_session().await.unwrap();
        assert_eq!(form.field("signature"), Some("abc"));
        assert_eq!(controller.phase(), ViewPhase::FormVisible);
        assert!(controller.error().is_none());
    }

    #[test]
    fn test_invalid_request_sets_error() {
        let mut controller = controller();
        controller.request_mut().customer_email = String::new();
        assert!(controller.begin_session(now()).is_err());
        assert_eq!(controller.phase(), ViewPhase::Input);
        assert!(controller.error().is_some());
    }

    #[test]
    fn test_cleared_reference_blocks_session() {
        let mut controller = controller();
        controller.request_mut().merchant_reference = MerchantReference::from_string("");
        let err = controller.begin_session(now()).unwrap_err();
        assert!(matches!(err, TokenizeError::Validation(_)));
        assert_eq!(controller.phase(), ViewPhase::Input);
        assert_eq!(controller.error(), Some("Merchant reference is required"));
    }

    #[test]
    fn test_stale_completion_discarded() {
        let mut controller = controller();
        let pending = controller.begin_session(now()).unwrap();
        controller.cancel_session();

        let result = controller.complete_session(pending.ticket, Ok(form_for("TEST-20240101120000")));
        assert!(matches!(result, Err(TokenizeError::StaleSession)));
        assert_eq!(controller.phase(), ViewPhase::Input);
        assert!(controller.hidden_form().is_none());
    }

    #[test]
    fn test_backend_error_hides_frame() {
        let mut controller = controller();
        let pending = controller.begin_session(now()).unwrap();
        let result = controller.complete_session(
            pending.ticket,
            Err(TokenizeError::BackendStatus { status: 500, body: "boom".into() }),
        );
        assert!(result.is_err());
        assert_eq!(controller.phase(), ViewPhase::Input);
        assert_eq!(controller.error(), Some("Failed to get tokenization form data from API"));
        assert!(controller.hidden_form().is_none());
    }

    #[test]
    fn test_submit_claimed_once() {
        let mut controller = controller();
        let pending = controller.begin_session(now()).unwrap();
        controller
            .complete_session(pending.ticket, Ok(form_for("TEST-20240101120000")))
            .unwrap();

        assert!(controller.mark_submitted(pending.ticket));
        assert!(!controller.mark_submitted(pending.ticket));
    }

    #[test]
    fn test_restart_tears_down_and_invalidates_timers() {
        let mut controller = controller();
        let pending = controller.begin_session(now()).unwrap();
        controller
            .complete_session(pending.ticket, Ok(form_for("TEST-20240101120000")))
            .unwrap();
        controller.frame_loaded();

        let later = Utc.with_ymd_and_hms(2024, 1, 1, 12, 5, 0).unwrap();
        controller.restart_session(later);

        assert_eq!(controller.request().merchant_reference.as_str(), "TEST-20240101120500");
        assert_eq!(controller.phase(), ViewPhase::Input);
        assert_eq!(
            controller.poll_tick(pending.ticket, &CrossOriginFrame, &NullMessenger),
            TickOutcome::Skipped
        );
        assert!(!controller.mark_submitted(pending.ticket));
        assert_eq!(controller.injection_state().attempts, 0);
    }

    #[test]
    fn test_redirect_ends_session() {
        let mut controller = controller();
        let pending = controller.begin_session(now()).unwrap();
        controller
            .complete_session(pending.ticket, Ok(form_for("TEST-20240101120000")))
            .unwrap();
        controller.frame_loaded();

        let message = InboundMessage::new(
            "https://api.example",
            json!({"type": "payment_callback", "action": "redirect",
                   "redirectUrl": "/order-details/TEST-20240101120000", "success": true,
                   "merchantReference": "TEST-20240101120000"}),
        );
        let dispatch = controller.handle_message(&message, &CrossOriginFrame, &NullMessenger);
        assert_eq!(dispatch, Dispatch::Navigate("/order-details/TEST-20240101120000".into()));

        // Anything after the terminal event is dropped
        let again = controller.handle_message(&message, &CrossOriginFrame, &NullMessenger);
        assert_eq!(again, Dispatch::Ignored);
        assert_eq!(controller.injection_state().attempts, 0);
        assert_eq!(
            controller.poll_tick(pending.ticket, &CrossOriginFrame, &NullMessenger),
            TickOutcome::Skipped
        );
    }

    #[test]
    fn test_dark_theme_stylesheet_selected() {
        let mut controller = controller();
        controller.request_mut().theme = Theme::Dark;
        let pending = controller.begin_session(now()).unwrap();
        controller
            .complete_session(pending.ticket, Ok(form_for("TEST-20240101120000")))
            .unwrap();
        controller.frame_loaded();

        assert_eq!(controller.view().theme, Theme::Dark);
        assert_eq!(controller.injector.phase(), InjectionPhase::Polling);
        assert!(controller.injector.stylesheet().contains("#1e1e2e"));
    }
}
