//! Telegram bot integration.

pub mod sender;

pub use sender::{Deliver, TelegramSender};
