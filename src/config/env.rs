//! Environment variable configuration loading.
//!
//! All four variables are required:
//! - `TOKEN` - Discord bot token
//! - `CHANNELID` - Discord channel to mirror
//! - `BOT_TOKEN` - Telegram bot token
//! - `GROUP_ID` - Telegram chat id (base-10 integer)

use std::env;
use std::time::Duration;

use crate::common::error::ConfigError;
use crate::config::types::BridgeConfig;

/// Discord bot token.
pub const ENV_DISCORD_TOKEN: &str = "TOKEN";
/// Discord channel to mirror.
pub const ENV_DISCORD_CHANNEL_ID: &str = "CHANNELID";
/// Telegram bot token.
pub const ENV_TELEGRAM_TOKEN: &str = "BOT_TOKEN";
/// Telegram chat id.
pub const ENV_TELEGRAM_CHAT_ID: &str = "GROUP_ID";

/// Discord HTTP connection timeout. Not externally configurable.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Load the relay configuration from the process environment.
pub fn load() -> Result<BridgeConfig, ConfigError> {
    from_lookup(|name| env::var(name).ok())
}

/// Build a configuration from an arbitrary variable lookup.
fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<BridgeConfig, ConfigError> {
    let discord_token = require(&lookup, ENV_DISCORD_TOKEN)?;
    let discord_channel_id = require(&lookup, ENV_DISCORD_CHANNEL_ID)?;
    let telegram_token = require(&lookup, ENV_TELEGRAM_TOKEN)?;
    let telegram_chat_id = require(&lookup, ENV_TELEGRAM_CHAT_ID)?
        .parse::<i64>()
        .map_err(|e| ConfigError::InvalidValue {
            name: ENV_TELEGRAM_CHAT_ID,
            message: e.to_string(),
        })?;

    Ok(BridgeConfig {
        discord_token,
        discord_channel_id,
        telegram_token,
        telegram_chat_id,
        connect_timeout: CONNECT_TIMEOUT,
    })
}

/// Read a required variable. Missing and empty are treated the same.
fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar { name }),
    }
}
