//! Background task forwarding bus events to the push service.
//!
//! [`PushForwarder`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and delivers every [`PushEvent`] through [`WebhookDelivery`]. Without a
//! configured push service it only logs the events. The loop exits when the
//! bus is dropped or the cancellation token fires.

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::bus::PushEvent;
use crate::delivery::webhook::WebhookDelivery;

/// Counters reported when the forwarder stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwarderStats {
    pub delivered: u64,
    pub failed: u64,
    /// Events only logged because no push service is configured.
    pub logged: u64,
    /// Events lost because the forwarder lagged behind the bus.
    pub skipped: u64,
    /// Events still buffered on the bus when the forwarder was cancelled.
    pub abandoned: u64,
}

pub struct PushForwarder {
    delivery: Option<WebhookDelivery>,
}

impl PushForwarder {
    pub fn new(delivery: Option<WebhookDelivery>) -> Self {
        Self { delivery }
    }

    /// Run the forwarding loop until the bus closes or `cancel` fires.
    pub async fn run(
        self,
        mut receiver: broadcast::Receiver<PushEvent>,
        cancel: CancellationToken,
    ) -> ForwarderStats {
        let mut stats = ForwarderStats::default();

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    stats.abandoned = Self::discard_buffered(&mut receiver);
                    if stats.abandoned > 0 {
                        tracing::warn!(
                            abandoned = stats.abandoned,
                            "Push forwarder cancelled with undelivered events"
                        );
                    } else {
                        tracing::info!("Push forwarder cancelled");
                    }
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => self.forward(&event, &mut stats).await,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Push forwarder lagged, events were dropped");
                        stats.skipped += n;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, push forwarder shutting down");
                        break;
                    }
                },
            }
        }

        tracing::info!(
            delivered = stats.delivered,
            failed = stats.failed,
            logged = stats.logged,
            skipped = stats.skipped,
            abandoned = stats.abandoned,
            "Push forwarder stopped"
        );
        stats
    }

    /// Empty the receiver without delivering, returning how many events
    /// were left behind.
    fn discard_buffered(receiver: &mut broadcast::Receiver<PushEvent>) -> u64 {
        let mut count = 0;
        loop {
            match receiver.try_recv() {
                Ok(_) => count += 1,
                Err(broadcast::error::TryRecvError::Lagged(n)) => count += n,
                Err(_) => return count,
            }
        }
    }

    async fn forward(&self, event: &PushEvent, stats: &mut ForwarderStats) {
        let Some(delivery) = &self.delivery else {
            let payload = serde_json::to_string(event).unwrap_or_default();
            tracing::info!(
                event_id = %event.event_id,
                object_type = %event.object_type,
                targets = event.targets.len(),
                payload = %payload,
                "Push event (no push service configured)"
            );
            stats.logged += 1;
            return;
        };

        match delivery.deliver(event).await {
            Ok(()) => {
                tracing::debug!(event_id = %event.event_id, "Push event delivered");
                stats.delivered += 1;
            }
            Err(e) => {
                tracing::error!(
                    event_id = %event.event_id,
                    error = %e,
                    "Dropping push event after failed delivery"
                );
                stats.failed += 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
