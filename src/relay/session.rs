//! Relay session lifecycle.
//!
//! Owns the Discord gateway connection, the inbound event stream and the
//! Telegram sender. Runs until the shutdown token is set, then closes
//! the gateway and returns.

use serenity::Client;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use crate::common::InboundEvent;
use crate::config::BridgeConfig;
use crate::relay::filter::should_forward;
use crate::telegram::{Deliver, TelegramSender};

/// The running relay instance.
pub struct RelaySession {
    config: BridgeConfig,
    client: Client,
    events_rx: mpsc::UnboundedReceiver<InboundEvent>,
    sender: TelegramSender,
    shutdown_rx: watch::Receiver<bool>,
}

impl RelaySession {
    pub fn new(
        config: BridgeConfig,
        client: Client,
        events_rx: mpsc::UnboundedReceiver<InboundEvent>,
        sender: TelegramSender,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            client,
            events_rx,
            sender,
            shutdown_rx,
        }
    }

    /// Run the relay until shutdown.
    ///
    /// Returns an error when the gateway connection cannot be opened;
    /// delivery failures never end the session.
    pub async fn run(self) -> anyhow::Result<()> {
        let RelaySession {
            config,
            mut client,
            mut events_rx,
            sender,
            shutdown_rx,
        } = self;

        let shard_manager = client.shard_manager.clone();

        tokio::select! {
            result = client.start() => {
                result.map_err(|e| {
                    error!("Cannot open the Discord session: {}", e);
                    e
                })?;
                info!("Discord gateway closed");
            }
            _ = forward_events(
                &mut events_rx,
                &config.discord_channel_id,
                &sender,
                shutdown_rx,
            ) => {}
        }

        // Single teardown path; close the gateway exactly once.
        shard_manager.shutdown_all().await;
        info!("Graceful shutdown");
        Ok(())
    }
}

/// Consume inbound events until shutdown is signalled or the producer
/// goes away.
///
/// Each qualifying event is delivered to completion before the next one
/// is taken off the channel. Events from other channels are dropped
/// silently.
async fn forward_events<D: Deliver>(
    events_rx: &mut mpsc::UnboundedReceiver<InboundEvent>,
    mirrored_channel_id: &str,
    sender: &D,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            event = events_rx.recv() => {
                match event {
                    Some(event) => {
                        if !should_forward(&event.origin_channel_id, mirrored_channel_id) {
                            continue;
                        }
                        if let Err(e) = sender.deliver(&event.text).await {
                            error!("Telegram delivery failed: {:#}", e);
                        }
                    }
                    None => {
                        info!("Discord event channel closed");
                        break;
                    }
                }
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    info!("Shutdown signal received, stopping relay loop");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Records delivered texts; fails a single delivery on demand.
    #[derive(Default)]
    struct RecordingSender {
        delivered: Mutex<Vec<String>>,
        fail_next: AtomicBool,
    }

    impl RecordingSender {
        fn delivered(&self) -> Vec<String> {
            self.delivered.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Deliver for RecordingSender {
        async fn deliver(&self, text: &str) -> anyhow::Result<()> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                anyhow::bail!("telegram unavailable");
            }
            self.delivered.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn event(channel: &str, text: &str) -> InboundEvent {
        InboundEvent {
            origin_channel_id: channel.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn matching_event_is_delivered_once() {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let sender = RecordingSender::default();

        events_tx.send(event("100", "hello")).unwrap();
        drop(events_tx); // loop ends once the queue drains

        forward_events(&mut events_rx, "100", &sender, shutdown_rx).await;

        assert_eq!(sender.delivered(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn foreign_event_is_dropped() {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let sender = RecordingSender::default();

        events_tx.send(event("200", "hello")).unwrap();
        drop(events_tx);

        forward_events(&mut events_rx, "100", &sender, shutdown_rx).await;

        assert!(sender.delivered().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_does_not_stop_the_loop() {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let sender = RecordingSender::default();
        sender.fail_next.store(true, Ordering::SeqCst);

        events_tx.send(event("100", "first")).unwrap();
        events_tx.send(event("100", "second")).unwrap();
        drop(events_tx);

        forward_events(&mut events_rx, "100", &sender, shutdown_rx).await;

        // The first delivery failed and was swallowed; the second one
        // still went out.
        assert_eq!(sender.delivered(), vec!["second".to_string()]);
    }

    #[tokio::test]
    async fn shutdown_token_stops_the_loop() {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel::<InboundEvent>();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sender = RecordingSender::default();

        shutdown_tx.send(true).unwrap();
        forward_events(&mut events_rx, "100", &sender, shutdown_rx.clone()).await;

        // Signalling again after the loop has exited has nothing left to
        // observe.
        shutdown_tx.send(true).unwrap();
        assert!(sender.delivered().is_empty());
        drop(events_tx);
    }

    #[tokio::test]
    async fn rescinded_shutdown_keeps_the_loop_running() {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sender = RecordingSender::default();

        // A token notification that does not carry `true` must not stop
        // the loop.
        shutdown_tx.send(false).unwrap();
        events_tx.send(event("100", "still running")).unwrap();
        drop(events_tx);

        forward_events(&mut events_rx, "100", &sender, shutdown_rx).await;

        assert_eq!(sender.delivered(), vec!["still running".to_string()]);
    }
}
