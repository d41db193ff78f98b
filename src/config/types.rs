//! Configuration type definitions.

use std::time::Duration;

/// Immutable relay configuration, populated once at startup.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Discord bot token.
    pub discord_token: String,
    /// Discord channel to mirror. Kept as an opaque string and compared
    /// byte-for-byte against incoming events.
    pub discord_channel_id: String,
    /// Telegram bot token.
    pub telegram_token: String,
    /// Telegram chat that receives mirrored messages.
    pub telegram_chat_id: i64,
    /// HTTP connection timeout for the Discord client.
    pub connect_timeout: Duration,
}
