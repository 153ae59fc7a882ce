//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the hand-off point between the synchronous dispatcher and
//! the asynchronous delivery side. It is designed to be shared via
//! `Arc<EventBus>`.

use chrono::{DateTime, Utc};
use pushsource_core::collaborators::DeliverySink;
use pushsource_core::{EntityTypeTag, Message, Target};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// PushEvent
// ---------------------------------------------------------------------------

/// One dispatched message together with its fan-out targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEvent {
    /// Unique id, lets the push service drop duplicate deliveries.
    pub event_id: Uuid,

    /// Routing type of the source object (`post`/`comment` type name).
    pub object_type: EntityTypeTag,

    pub message: Message,

    /// Subscriber groups to notify, in resolution order.
    pub targets: Vec<Target>,

    /// When the event was dispatched (UTC).
    pub timestamp: DateTime<Utc>,
}

impl PushEvent {
    pub fn new(object_type: EntityTypeTag, message: Message, targets: Vec<Target>) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            object_type,
            message,
            targets,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use pushsource_events::bus::EventBus;
///
/// let bus = EventBus::default();
/// let _rx = bus.subscribe();
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PushEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed events are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is dropped.
    pub fn publish(&self, event: PushEvent) {
        if self.sender.send(event).is_err() {
            tracing::debug!("Push event published with no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PushEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl DeliverySink for EventBus {
    fn deliver(&self, object_type: &EntityTypeTag, message: &Message, targets: &[Target]) {
        self.publish(PushEvent::new(
            object_type.clone(),
            message.clone(),
            targets.to_vec(),
        ));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
