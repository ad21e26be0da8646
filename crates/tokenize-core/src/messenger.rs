//! Cross-Origin Messenger
//!
//! Outbound half of the cross-document channel. The inbound half is a
//! host-window subscription owned by the front-end; every inbound message is
//! handed to [`crate::TokenizationController::handle_message`] unfiltered.

use crate::error::Result;
use crate::message::OutboundMessage;

/// Target origin used for every post; the embedded origin is not known up front
pub const ANY_ORIGIN: &str = "*";

/// Posts structured messages into the embedded frame
///
/// Fire-and-forget: an `Ok` only means the message was handed to the
/// browser, not that the frame received it.
pub trait Messenger {
    fn send(&self, message: &OutboundMessage) -> Result<()>;
}
