//! Delivery side of the push fan-out.
//!
//! - [`EventBus`] — [`DeliverySink`](pushsource_core::collaborators::DeliverySink)
//!   that publishes every dispatched message as a [`PushEvent`] on a
//!   `tokio::sync::broadcast` channel.
//! - [`PushForwarder`] — background task draining the bus into the upstream
//!   push service.
//! - [`delivery`] — webhook transport to the push service.

pub mod bus;
pub mod delivery;
pub mod forwarder;

pub use bus::{EventBus, PushEvent};
pub use delivery::webhook::{PushServiceConfig, WebhookDelivery, WebhookError};
pub use forwarder::PushForwarder;
