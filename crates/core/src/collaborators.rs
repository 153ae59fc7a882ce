//! Services the fan-out core consumes but does not own.
//!
//! A CMS host implements these against its own storage; tests and the worker
//! use the in-memory versions from [`crate::memory`]. All of them are treated
//! as fast local calls and must be safe to share across threads.

use crate::content::Comment;
use crate::entity_types::{EntityKind, EntityTypeTag};
use crate::error::LookupError;
use crate::message::{Message, Target};
use crate::types::DbId;

/// Resolves user ids to display names.
pub trait UserDirectory: Send + Sync {
    /// Display name of `user_id`, or `None` when the user does not exist.
    fn display_name(&self, user_id: DbId) -> Option<String>;
}

/// Maps entity roles to the deployment's type names.
pub trait EntityTypeRegistry: Send + Sync {
    fn entity_type(&self, kind: EntityKind) -> EntityTypeTag;
}

/// Looks up the taxonomy terms attached to an object.
pub trait TaxonomyLookup: Send + Sync {
    /// Term ids of `taxonomy` attached to `object_id`, in storage order.
    fn terms_for(&self, object_id: DbId, taxonomy: &EntityTypeTag)
        -> Result<Vec<DbId>, LookupError>;
}

/// Reduces raw markup to notification-friendly text.
pub trait ContentSanitizer: Send + Sync {
    fn render(&self, raw_body: &str) -> String;
}

/// Resolves post titles, used to label comment notifications.
pub trait PostTitleLookup: Send + Sync {
    fn post_title(&self, post_id: DbId) -> Option<String>;
}

/// Reads stored comments by id.
pub trait CommentStore: Send + Sync {
    fn comment(&self, comment_id: DbId) -> Option<Comment>;
}

/// Receives finished messages. Fire-and-forget: the sink owns queueing,
/// retries and transport.
pub trait DeliverySink: Send + Sync {
    fn deliver(&self, object_type: &EntityTypeTag, message: &Message, targets: &[Target]);
}
