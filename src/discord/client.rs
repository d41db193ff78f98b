//! Discord client construction and gateway event forwarding.
//!
//! Hides serenity implementation details from the rest of the
//! application: gateway callbacks are converted into [`InboundEvent`]
//! values on an unbounded channel that the relay loop consumes.

use std::time::Duration;

use serenity::async_trait;
use serenity::http::HttpBuilder;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use serenity::Client;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::common::InboundEvent;

/// Gateway event handler that forwards message events to the relay loop.
struct EventForwarder {
    events_tx: mpsc::UnboundedSender<InboundEvent>,
}

#[async_trait]
impl EventHandler for EventForwarder {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Discord bot connected as {}", ready.user.name);
    }

    async fn message(&self, _ctx: Context, message: Message) {
        let event = InboundEvent {
            origin_channel_id: message.channel_id.to_string(),
            text: message.content,
        };
        if let Err(e) = self.events_tx.send(event) {
            warn!("Failed to queue Discord message: {}", e);
        }
    }
}

/// Build the Discord client with the event forwarder registered.
///
/// The returned client has not opened the gateway connection yet;
/// [`Client::start`] does that on the relay session's run path.
pub async fn build_client(
    token: &str,
    connect_timeout: Duration,
    events_tx: mpsc::UnboundedSender<InboundEvent>,
) -> anyhow::Result<Client> {
    // Non-privileged intents are enough to receive channel messages.
    let intents = GatewayIntents::non_privileged();

    let reqwest_client = reqwest::Client::builder()
        .timeout(connect_timeout)
        .connect_timeout(connect_timeout)
        .build()?;

    let http = HttpBuilder::new(token).client(reqwest_client).build();

    let client = serenity::client::ClientBuilder::new_with_http(http, intents)
        .event_handler(EventForwarder { events_tx })
        .await?;
    Ok(client)
}
