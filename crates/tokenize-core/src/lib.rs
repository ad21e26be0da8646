//! # tokenize-core
//!
//! Session controller and cross-frame protocol for a hosted card
//! tokenization flow.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐  POST   ┌──────────────┐
//! │  Controller  │────────▶│   Backend    │  request-tokenization
//! └──────┬───────┘         └──────────────┘
//!        │ hidden GET form (target = paymentFrame)
//!        ▼
//! ┌──────────────────────────────────────────┐
//! │ proxy page ──▶ gateway hosted page       │  embedded iframe
//! └──────┬───────────────────────────▲───────┘
//!        │ postMessage               │ injectCss
//!        ▼                           │
//! ┌──────────────┐          ┌────────┴───────┐
//! │  Dispatcher  │─────────▶│ StyleInjector  │  1s ticks, max 10 attempts
//! └──────┬───────┘          └────────────────┘
//!        │ payment_callback / redirect
//!        ▼
//!   navigate(redirectUrl)
//! ```
//!
//! Everything that touches a browser sits behind a trait
//! ([`Messenger`], [`FrameDocument`], [`TokenizationBackend`]) so the
//! state machines run unchanged in the WASM front-end and in native tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tokenize_core::{HttpTokenizationClient, TokenizationController, TokenizeConfig};
//!
//! let config = TokenizeConfig::from_env();
//! let backend = Arc::new(HttpTokenizationClient::from_config(&config)?);
//! let mut controller = TokenizationController::new(backend, config, None, chrono::Utc::now());
//!
//! let form = controller.start_session().await?;
//! // render `form` hidden, submit it into the frame after `submit_delay`
//! ```

pub mod backend;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod form;
pub mod injection;
pub mod message;
pub mod messenger;
pub mod routes;
pub mod session;
pub mod theme;

pub use backend::{HttpTokenizationClient, TokenizationBackend};
pub use config::TokenizeConfig;
pub use controller::{ControllerView, PendingSession, TokenizationController, ViewPhase};
pub use dispatcher::{CallbackDispatcher, Dispatch, SessionGuard};
pub use error::{FrameAccessError, Result, TokenizeError};
pub use form::{HiddenForm, TokenizationFormData};
pub use injection::{FrameDocument, InjectionPhase, InjectionState, StyleInjector, TickOutcome};
pub use message::{CallbackMessage, InboundMessage, OutboundMessage, PaymentRedirect};
pub use messenger::Messenger;
pub use routes::AppRoute;
pub use session::{Language, MerchantReference, PaymentRequest, Session, SessionTicket, Theme};
