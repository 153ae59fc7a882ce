//! The normalized push payload and its subscription targets.
//!
//! Serialized field names follow the upstream push service's wire format
//! (`section__title`, `post__title`, targets as `[type, id]` pairs).

use serde::{Deserialize, Serialize};

use crate::entity_types::EntityTypeTag;
use crate::types::DbId;

/// Username used when no author can be resolved.
pub const ANONYMOUS_USERNAME: &str = "Anonymous";

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Canonical notification payload for one post or comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Id of the post or comment the message describes.
    pub id: DbId,
    /// Author user id, `0` for guests.
    pub user_id: DbId,
    /// Display name of the author; never empty.
    pub username: String,
    /// Post title; `None` for comments.
    pub title: Option<String>,
    /// Sanitized body text.
    pub content: String,
    /// Filled in downstream from the delivery context; always `None` here.
    #[serde(rename = "section__title")]
    pub section_title: Option<String>,
    /// Title of the commented post; `None` for posts.
    #[serde(rename = "post__title", default, skip_serializing_if = "Option::is_none")]
    pub post_title: Option<String>,
}

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

/// A subscriber group: everyone subscribed to `entity_id` of `entity_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "(EntityTypeTag, DbId)", from = "(EntityTypeTag, DbId)")]
pub struct Target {
    pub entity_type: EntityTypeTag,
    pub entity_id: DbId,
}

impl Target {
    pub fn new(entity_type: EntityTypeTag, entity_id: DbId) -> Self {
        Self {
            entity_type,
            entity_id,
        }
    }
}

impl From<Target> for (EntityTypeTag, DbId) {
    fn from(target: Target) -> Self {
        (target.entity_type, target.entity_id)
    }
}

impl From<(EntityTypeTag, DbId)> for Target {
    fn from((entity_type, entity_id): (EntityTypeTag, DbId)) -> Self {
        Self::new(entity_type, entity_id)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.entity_id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
