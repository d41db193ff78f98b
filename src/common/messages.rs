//! Canonical message types for relay communication.

/// A message event received from the Discord gateway.
///
/// Created by the gateway handler, consumed once by the relay loop,
/// then dropped. Never stored.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// Channel the message was posted in, rendered as an opaque string.
    pub origin_channel_id: String,
    /// Raw message text.
    pub text: String,
}
