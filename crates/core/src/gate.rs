//! Decides whether a content lifecycle event is worth a notification.
//!
//! Autosaves, revisions, edits, unapproved comments and writes coming in
//! through the REST API never notify anybody. Rejection is a normal outcome,
//! not an error.

use serde::{Deserialize, Serialize};

use crate::collaborators::EntityTypeRegistry;
use crate::content::{ApprovalState, Comment, Post};
use crate::entity_types::{EntityKind, EntityTypeTag};

// ---------------------------------------------------------------------------
// InsertContext
// ---------------------------------------------------------------------------

/// Request-level facts the host knows about an insert hook invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertContext {
    /// The hook fired for an existing object being updated.
    pub updating: bool,
    /// The object is an autosave.
    pub autosave: bool,
    /// The object is a revision.
    pub revision: bool,
    /// The write came in through the REST API.
    pub rest_originated: bool,
}

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleKind {
    PostInserted,
    CommentInserted,
}

/// Metadata of one insert hook invocation, consumed once by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub kind: LifecycleKind,
    /// Content type of the inserted post; `None` for comments.
    pub content_type: Option<EntityTypeTag>,
    pub is_update: bool,
    pub is_autosave: bool,
    pub is_revision: bool,
    pub is_rest_originated: bool,
    /// Moderation state of the inserted comment; `None` when the comment
    /// record could not be read (and for posts).
    pub approval: Option<ApprovalState>,
}

impl LifecycleEvent {
    pub fn post_inserted(post: &Post, ctx: &InsertContext) -> Self {
        Self {
            kind: LifecycleKind::PostInserted,
            content_type: Some(EntityTypeTag::new(post.post_type.as_str())),
            is_update: ctx.updating,
            is_autosave: ctx.autosave,
            is_revision: ctx.revision,
            is_rest_originated: ctx.rest_originated,
            approval: None,
        }
    }

    /// `comment` is `None` when the stored record could not be fetched.
    pub fn comment_inserted(comment: Option<&Comment>, ctx: &InsertContext) -> Self {
        Self {
            kind: LifecycleKind::CommentInserted,
            content_type: None,
            is_update: ctx.updating,
            is_autosave: ctx.autosave,
            is_revision: ctx.revision,
            is_rest_originated: ctx.rest_originated,
            approval: comment.map(|c| c.approval),
        }
    }
}

// ---------------------------------------------------------------------------
// InsertionGate
// ---------------------------------------------------------------------------

pub struct InsertionGate<'a> {
    registry: &'a dyn EntityTypeRegistry,
}

impl<'a> InsertionGate<'a> {
    pub fn new(registry: &'a dyn EntityTypeRegistry) -> Self {
        Self { registry }
    }

    /// Pure predicate: `true` when the event should produce a notification.
    pub fn should_process(&self, event: &LifecycleEvent) -> bool {
        if event.is_update || event.is_rest_originated {
            return false;
        }

        match event.kind {
            LifecycleKind::PostInserted => {
                let post_type = self.registry.entity_type(EntityKind::Post);
                event.content_type.as_ref() == Some(&post_type)
                    && !event.is_autosave
                    && !event.is_revision
            }
            LifecycleKind::CommentInserted => {
                event.approval.is_some_and(|state| state.is_approved())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
