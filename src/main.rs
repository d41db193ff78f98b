//! Courier - Discord-to-Telegram channel relay.
//!
//! A single-purpose bot that mirrors every message posted in one Discord
//! channel into one Telegram chat.

mod common;
mod config;
mod discord;
mod relay;
mod telegram;

use anyhow::Result;
use tokio::signal;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::fmt::writer::MakeWriterExt;

use common::InboundEvent;
use relay::RelaySession;
use telegram::TelegramSender;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging. Errors go to stderr, everything else to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(
            std::io::stderr
                .with_max_level(tracing::Level::ERROR)
                .or_else(std::io::stdout),
        )
        .init();

    info!("Courier v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  Discord channel: {}", config.discord_channel_id);
    info!("  Telegram chat: {}", config.telegram_chat_id);

    // Startup is all-or-nothing: authenticate the Telegram side before
    // opening anything towards Discord.
    let sender = TelegramSender::connect(&config.telegram_token, config.telegram_chat_id)
        .await
        .map_err(|e| {
            error!("Failed to connect Telegram bot: {:#}", e);
            e
        })?;

    // Event channel between the gateway handler and the relay loop
    let (events_tx, events_rx) = mpsc::unbounded_channel::<InboundEvent>();

    let client = discord::build_client(&config.discord_token, config.connect_timeout, events_tx)
        .await
        .map_err(|e| {
            error!("Failed to build Discord client: {:#}", e);
            e
        })?;

    // Shutdown token, satisfied by Ctrl+C or SIGTERM
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    RelaySession::new(config, client, events_rx, sender, shutdown_rx)
        .run()
        .await?;

    info!("Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
