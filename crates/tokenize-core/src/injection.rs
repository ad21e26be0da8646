//! Style Injection Retrier
//!
//! Best-effort cosmetic styling of the embedded card-entry page.
//!
//! ```text
//!            frame load              direct inject ok / css_injected
//!   Idle ───────────────▶ Polling ──────────────────────────────▶ Injected
//!                           │  ▲
//!                 tick/fail │  │ attempts < max
//!                           ▼  │
//!                         (retry) ── attempts == max ──▶ Exhausted
//! ```
//!
//! The retrier is tick-driven: the host owns the 1-second timer and calls
//! [`StyleInjector::tick`]. A frame reload resets everything, including the
//! terminal states.

use crate::config::DEFAULT_MAX_INJECTION_ATTEMPTS;
use crate::error::FrameAccessError;
use crate::message::OutboundMessage;
use crate::messenger::Messenger;

/// Direct (same-origin) access to the embedded frame's document
pub trait FrameDocument {
    /// Append a `<style>` element with `css` to the frame's head
    fn inject_style(&self, css: &str) -> std::result::Result<(), FrameAccessError>;
}

/// Retrier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InjectionPhase {
    #[default]
    Idle,
    Polling,
    Injected,
    Exhausted,
}

impl InjectionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, InjectionPhase::Injected | InjectionPhase::Exhausted)
    }
}

/// Observable injection state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InjectionState {
    pub injected: bool,
    pub attempts: u32,
    pub max_attempts: u32,
}

/// What a tick (or an immediate attempt) did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do in the current phase
    Skipped,
    /// Stylesheet applied directly
    Injected,
    /// Injection request posted to the frame
    Requested { attempt: u32 },
    /// Budget spent; polling stops
    Exhausted,
}

impl TickOutcome {
    /// The host should clear its retry timer
    pub fn stops_polling(&self) -> bool {
        matches!(self, TickOutcome::Injected | TickOutcome::Exhausted)
    }
}

/// Injection retry state machine
#[derive(Clone, Debug)]
pub struct StyleInjector {
    phase: InjectionPhase,
    attempts: u32,
    max_attempts: u32,
    stylesheet: String,
}

impl StyleInjector {
    pub fn new(stylesheet: impl Into<String>) -> Self {
        Self::with_max_attempts(stylesheet, DEFAULT_MAX_INJECTION_ATTEMPTS)
    }

    pub fn with_max_attempts(stylesheet: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            phase: InjectionPhase::Idle,
            attempts: 0,
            max_attempts: max_attempts.max(1),
            stylesheet: stylesheet.into(),
        }
    }

    pub fn phase(&self) -> InjectionPhase {
        self.phase
    }

    pub fn state(&self) -> InjectionState {
        InjectionState {
            injected: self.phase == InjectionPhase::Injected,
            attempts: self.attempts,
            max_attempts: self.max_attempts,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.phase == InjectionPhase::Polling
    }

    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    /// Swap the stylesheet for the next session
    pub fn set_stylesheet(&mut self, stylesheet: impl Into<String>) {
        self.stylesheet = stylesheet.into();
    }

    /// Frame (re)loaded: reset and start polling
    pub fn frame_loaded(&mut self) {
        self.reset();
        self.phase = InjectionPhase::Polling;
        tracing::debug!("Frame loaded, style injection polling started");
    }

    /// Back to `Idle` (session torn down)
    pub fn reset(&mut self) {
        self.phase = InjectionPhase::Idle;
        self.attempts = 0;
    }

    /// Timer tick
    pub fn tick(&mut self, frame: &dyn FrameDocument, messenger: &dyn Messenger) -> TickOutcome {
        if self.phase != InjectionPhase::Polling {
            return TickOutcome::Skipped;
        }
        self.attempt(frame, messenger)
    }

    /// In-frame script announced itself: try right away
    pub fn on_ready(&mut self, frame: &dyn FrameDocument, messenger: &dyn Messenger) -> TickOutcome {
        if self.phase.is_terminal() {
            return TickOutcome::Skipped;
        }
        self.phase = InjectionPhase::Polling;
        self.attempt(frame, messenger)
    }

    /// In-frame script confirmed the stylesheet
    pub fn on_injection_succeeded(&mut self) -> TickOutcome {
        match self.phase {
            InjectionPhase::Exhausted => TickOutcome::Skipped,
            _ => {
                tracing::debug!(attempts = self.attempts, "Stylesheet confirmed by frame");
                self.phase = InjectionPhase::Injected;
                TickOutcome::Injected
            }
        }
    }

    /// In-frame script reported a failure; counts against the budget
    pub fn on_injection_failed(&mut self, reason: &str) -> TickOutcome {
        if self.phase != InjectionPhase::Polling {
            return TickOutcome::Skipped;
        }
        tracing::debug!(reason, attempts = self.attempts, "Frame failed to apply stylesheet");
        self.attempts += 1;
        self.check_budget()
            .unwrap_or(TickOutcome::Requested { attempt: self.attempts })
    }

    fn attempt(&mut self, frame: &dyn FrameDocument, messenger: &dyn Messenger) -> TickOutcome {
        match frame.inject_style(&self.stylesheet) {
            Ok(()) => {
                tracing::debug!("Stylesheet injected directly");
                self.phase = InjectionPhase::Injected;
                return TickOutcome::Injected;
            }
            Err(e) => tracing::trace!(error = %e, "Direct injection unavailable, messaging frame"),
        }

        let request = OutboundMessage::InjectCss {
            css: self.stylesheet.clone(),
        };
        if let Err(e) = messenger.send(&request) {
            tracing::debug!(error = %e, "Failed to post injection request");
        }

        self.attempts += 1;
        self.check_budget()
            .unwrap_or(TickOutcome::Requested { attempt: self.attempts })
    }

    fn check_budget(&mut self) -> Option<TickOutcome> {
        if self.attempts >= self.max_attempts {
            tracing::info!(
                attempts = self.attempts,
                "Style injection abandoned; frame stays usable unstyled"
            );
            self.phase = InjectionPhase::Exhausted;
            return Some(TickOutcome::Exhausted);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use std::cell::{Cell, RefCell};

    struct CrossOriginFrame;

    impl FrameDocument for CrossOriginFrame {
        fn inject_style(&self, _css: &str) -> std::result::Result<(), FrameAccessError> {
            Err(FrameAccessError::CrossOrigin)
        }
    }

    #[derive(Default)]
    struct SameOriginFrame {
        styles: RefCell<Vec<String>>,
    }

    impl FrameDocument for SameOriginFrame {
        fn inject_style(&self, css: &str) -> std::result::Result<(), FrameAccessError> {
            self.styles.borrow_mut().push(css.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingMessenger {
        sent: Cell<u32>,
    }

    impl Messenger for CountingMessenger {
        fn send(&self, _message: &OutboundMessage) -> Result<()> {
            self.sent.set(self.sent.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_idle_ticks_do_nothing() {
        let mut injector = StyleInjector::new("body{}");
        let messenger = CountingMessenger::default();
        assert_eq!(injector.tick(&CrossOriginFrame, &messenger), TickOutcome::Skipped);
        assert_eq!(messenger.sent.get(), 0);
    }

    #[test]
    fn test_exhausts_after_ten_ticks() {
        let mut injector = StyleInjector::new("body{}");
        let messenger = CountingMessenger::default();
        injector.frame_loaded();

        for attempt in 1..10 {
            assert_eq!(
                injector.tick(&CrossOriginFrame, &messenger),
                TickOutcome::Requested { attempt }
            );
        }
        assert_eq!(injector.tick(&CrossOriginFrame, &messenger), TickOutcome::Exhausted);
        assert_eq!(messenger.sent.get(), 10);
        assert_eq!(injector.phase(), InjectionPhase::Exhausted);

        // 11th tick posts nothing
        assert_eq!(injector.tick(&CrossOriginFrame, &messenger), TickOutcome::Skipped);
        assert_eq!(messenger.sent.get(), 10);
    }

    #[test]
    fn test_same_origin_injects_directly() {
        let mut injector = StyleInjector::new("body{color:red}");
        let frame = SameOriginFrame::default();
        let messenger = CountingMessenger::default();
        injector.frame_loaded();

        assert_eq!(injector.tick(&frame, &messenger), TickOutcome::Injected);
        assert_eq!(frame.styles.borrow().as_slice(), ["body{color:red}"]);
        assert_eq!(messenger.sent.get(), 0);
        assert!(injector.state().injected);
    }

    #[test]
    fn test_confirmation_before_first_tick() {
        let mut injector = StyleInjector::new("body{}");
        let messenger = CountingMessenger::default();
        injector.frame_loaded();

        assert_eq!(injector.on_injection_succeeded(), TickOutcome::Injected);
        for _ in 0..5 {
            assert_eq!(injector.tick(&CrossOriginFrame, &messenger), TickOutcome::Skipped);
        }
        assert_eq!(messenger.sent.get(), 0);
    }

    #[test]
    fn test_failure_reports_count_against_budget() {
        let mut injector = StyleInjector::with_max_attempts("body{}", 3);
        let messenger = CountingMessenger::default();
        injector.frame_loaded();

        injector.tick(&CrossOriginFrame, &messenger);
        assert_eq!(
            injector.on_injection_failed("blocked"),
            TickOutcome::Requested { attempt: 2 }
        );
        assert_eq!(injector.phase(), InjectionPhase::Polling);
        assert_eq!(injector.on_injection_failed("blocked"), TickOutcome::Exhausted);
    }

    #[test]
    fn test_reload_resets_exhausted() {
        let mut injector = StyleInjector::with_max_attempts("body{}", 2);
        let messenger = CountingMessenger::default();
        injector.frame_loaded();
        injector.tick(&CrossOriginFrame, &messenger);
        injector.tick(&CrossOriginFrame, &messenger);
        assert_eq!(injector.phase(), InjectionPhase::Exhausted);

        injector.frame_loaded();
        assert_eq!(injector.phase(), InjectionPhase::Polling);
        assert_eq!(injector.state().attempts, 0);
    }

    #[test]
    fn test_reload_mid_poll_resets_attempts() {
        let mut injector = StyleInjector::new("body{}");
        let messenger = CountingMessenger::default();
        injector.frame_loaded();
        for _ in 0..4 {
            injector.tick(&CrossOriginFrame, &messenger);
        }
        assert_eq!(injector.state().attempts, 4);

        injector.frame_loaded();
        assert_eq!(injector.state().attempts, 0);
    }

    #[test]
    fn test_ready_attempts_immediately() {
        let mut injector = StyleInjector::new("body{}");
        let messenger = CountingMessenger::default();

        assert_eq!(
            injector.on_ready(&CrossOriginFrame, &messenger),
            TickOutcome::Requested { attempt: 1 }
        );
        assert!(injector.is_polling());
        assert_eq!(messenger.sent.get(), 1);
    }
}
