//! Push-notification fan-out core.
//!
//! Turns CMS content lifecycle events (a new post, a newly approved comment)
//! into a canonical [`Message`] plus the ordered list of subscription
//! [`Target`]s it must be delivered to:
//!
//! - [`gate`] — decides whether a lifecycle event is processed at all.
//! - [`normalizer`] — builds the [`Message`] payload.
//! - [`targets`] — computes the subscription targets.
//! - [`dispatcher`] — wires the three together and hands the result to a
//!   [`DeliverySink`](collaborators::DeliverySink).
//!
//! Everything the CMS would normally provide (users, taxonomy terms, titles,
//! stored comments) is reached through the traits in [`collaborators`];
//! [`memory`] ships in-memory implementations of all of them.

pub mod collaborators;
pub mod content;
pub mod dispatcher;
pub mod entity_types;
pub mod error;
pub mod gate;
pub mod memory;
pub mod message;
pub mod normalizer;
pub mod sanitizer;
pub mod targets;
pub mod types;

pub use content::{ApprovalState, Comment, ContentItem, Post};
pub use dispatcher::{Collaborators, DispatchOutcome, EventDispatcher};
pub use entity_types::{EntityKind, EntityTypeTag, EntityTypes};
pub use error::{CoreError, LookupError};
pub use gate::{InsertContext, InsertionGate, LifecycleEvent, LifecycleKind};
pub use memory::{InMemorySite, RecordingSink};
pub use message::{Message, Target, ANONYMOUS_USERNAME};
pub use normalizer::Normalizer;
pub use sanitizer::PlainTextSanitizer;
pub use targets::TargetResolver;
