//! Outbound Telegram delivery.
//!
//! Wraps the teloxide bot in a single "deliver text" operation aimed at
//! one fixed chat.

use anyhow::anyhow;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::info;

/// A destination that accepts relayed message text.
///
/// The relay loop only depends on this trait, so tests can substitute a
/// recording fake for the real Telegram client.
#[async_trait]
pub trait Deliver: Send + Sync {
    /// Deliver one message to the destination chat.
    async fn deliver(&self, text: &str) -> anyhow::Result<()>;
}

/// Telegram sender bound to a single destination chat.
pub struct TelegramSender {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSender {
    /// Authenticate the bot token and bind the destination chat.
    ///
    /// Fails when Telegram rejects the credential; startup treats that
    /// as fatal.
    pub async fn connect(token: &str, chat_id: i64) -> anyhow::Result<Self> {
        let bot = Bot::new(token);
        let me = bot
            .get_me()
            .send()
            .await
            .map_err(|e| anyhow!("telegram authentication: {e}"))?;

        info!(
            "Telegram bot authenticated as @{}",
            me.user.username.as_deref().unwrap_or("unknown")
        );

        Ok(Self {
            bot,
            chat_id: ChatId(chat_id),
        })
    }
}

#[async_trait]
impl Deliver for TelegramSender {
    async fn deliver(&self, text: &str) -> anyhow::Result<()> {
        self.bot
            .send_message(self.chat_id, text)
            .send()
            .await
            .map_err(|e| anyhow!("telegram send text: {e}"))?;

        info!("Forwarded to Telegram: {}", text);
        Ok(())
    }
}
