//! Browser Bindings
//!
//! web-sys implementations of the core frame traits, plus the window
//! `message` subscription.

use serde_json::Value;
use tokenize_core::messenger::ANY_ORIGIN;
use tokenize_core::{FrameAccessError, FrameDocument, InboundMessage, Messenger, OutboundMessage, TokenizeError};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{HtmlIFrameElement, MessageEvent, Window};

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Posts to the payment frame's window
pub struct WindowMessenger {
    frame: Option<HtmlIFrameElement>,
}

impl WindowMessenger {
    pub fn new(frame: Option<HtmlIFrameElement>) -> Self {
        Self { frame }
    }
}

impl Messenger for WindowMessenger {
    fn send(&self, message: &OutboundMessage) -> tokenize_core::Result<()> {
        let target = self
            .frame
            .as_ref()
            .and_then(HtmlIFrameElement::content_window)
            .ok_or_else(|| TokenizeError::Messaging("payment frame has no window".into()))?;

        let json = serde_json::to_string(message)?;
        let payload = js_sys::JSON::parse(&json).map_err(|e| TokenizeError::Messaging(describe(&e)))?;

        // The gateway origin is not known to the page
        target
            .post_message(&payload, ANY_ORIGIN)
            .map_err(|e| TokenizeError::Messaging(describe(&e)))
    }
}

/// Direct DOM access to the payment frame's document
pub struct IframeDocument {
    frame: Option<HtmlIFrameElement>,
}

impl IframeDocument {
    pub fn new(frame: Option<HtmlIFrameElement>) -> Self {
        Self { frame }
    }
}

impl FrameDocument for IframeDocument {
    fn inject_style(&self, css: &str) -> Result<(), FrameAccessError> {
        let frame = self.frame.as_ref().ok_or(FrameAccessError::NotLoaded)?;
        // null for cross-origin documents
        let document = frame.content_document().ok_or(FrameAccessError::CrossOrigin)?;
        let head = document
            .head()
            .ok_or_else(|| FrameAccessError::Dom("frame document has no head".into()))?;

        let style = document
            .create_element("style")
            .map_err(|e| FrameAccessError::Dom(describe(&e)))?;
        style.set_text_content(Some(css));
        head.append_child(&style)
            .map_err(|e| FrameAccessError::Dom(describe(&e)))?;
        Ok(())
    }
}

/// Window `message` listener, removed on drop
pub struct MessageSubscription {
    window: Window,
    callback: Closure<dyn FnMut(MessageEvent)>,
}

impl MessageSubscription {
    pub fn listen(mut handler: impl FnMut(InboundMessage) + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let callback = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            if let Some(data) = to_json(&event.data()) {
                handler(InboundMessage::new(event.origin(), data));
            }
        });

        if let Err(e) = window.add_event_listener_with_callback("message", callback.as_ref().unchecked_ref()) {
            tracing::warn!(error = %describe(&e), "Could not subscribe to frame messages");
            return None;
        }
        Some(Self { window, callback })
    }
}

impl Drop for MessageSubscription {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("message", self.callback.as_ref().unchecked_ref());
    }
}

/// Structured-clone data to JSON; non-JSON payloads are dropped
fn to_json(data: &JsValue) -> Option<Value> {
    let text = js_sys::JSON::stringify(data).ok()?.as_string()?;
    serde_json::from_str(&text).ok()
}
