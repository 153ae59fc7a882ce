//! Content objects handed over by the CMS host.
//!
//! Values are read once from the source system and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

/// A published post as read from the CMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: DbId,
    /// Author user id; `0` (or negative) when the post has no author.
    #[serde(default)]
    pub author_id: DbId,
    #[serde(default)]
    pub title: String,
    /// Raw body markup.
    #[serde(default)]
    pub body: String,
    /// Content type name, compared against the registry's post type.
    pub post_type: String,
}

// ---------------------------------------------------------------------------
// ApprovalState
// ---------------------------------------------------------------------------

/// Moderation status of a comment.
///
/// The CMS stores this as a raw string: `"1"` approved, `"0"` pending,
/// `"spam"` and `"trash"`. Unrecognised values are treated as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApprovalState {
    Approved,
    Pending,
    Spam,
    Trash,
}

impl ApprovalState {
    /// Parse the raw CMS status string. Only the exact string `"1"` is
    /// approved.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "1" => Self::Approved,
            "spam" => Self::Spam,
            "trash" => Self::Trash,
            _ => Self::Pending,
        }
    }

    /// Return the raw CMS status string.
    pub fn as_raw(&self) -> &'static str {
        match self {
            Self::Approved => "1",
            Self::Pending => "0",
            Self::Spam => "spam",
            Self::Trash => "trash",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl From<String> for ApprovalState {
    fn from(raw: String) -> Self {
        Self::from_raw(&raw)
    }
}

impl From<ApprovalState> for String {
    fn from(state: ApprovalState) -> Self {
        state.as_raw().to_string()
    }
}

// ---------------------------------------------------------------------------
// Comment
// ---------------------------------------------------------------------------

/// A comment as read from the CMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: DbId,
    /// Registered commenter id; `0` for guest comments.
    #[serde(default)]
    pub user_id: DbId,
    /// Name typed in by a guest commenter, possibly empty.
    #[serde(default)]
    pub author_name: String,
    /// Parent comment id; `0` for a top-level comment.
    #[serde(default)]
    pub parent_id: DbId,
    /// The post the comment belongs to.
    pub post_id: DbId,
    #[serde(default)]
    pub body: String,
    pub approval: ApprovalState,
}

impl Comment {
    /// Whether this comment answers the post directly rather than another
    /// comment.
    pub fn is_top_level(&self) -> bool {
        self.parent_id == 0
    }
}

// ---------------------------------------------------------------------------
// ContentItem
// ---------------------------------------------------------------------------

/// Any object the host can hand to the pipeline.
///
/// `Other` carries objects that are neither posts nor comments (attachments,
/// users, menu items, ...); the normalizer rejects them and the target
/// resolver yields nothing for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    Post(Post),
    Comment(Comment),
    Other { kind: String },
}

impl ContentItem {
    /// Short label used in log fields.
    pub fn kind_label(&self) -> &str {
        match self {
            Self::Post(_) => "post",
            Self::Comment(_) => "comment",
            Self::Other { kind } => kind,
        }
    }

    /// Id of the underlying object, when it has one.
    pub fn id(&self) -> Option<DbId> {
        match self {
            Self::Post(post) => Some(post.id),
            Self::Comment(comment) => Some(comment.id),
            Self::Other { .. } => None,
        }
    }
}

impl From<Post> for ContentItem {
    fn from(post: Post) -> Self {
        Self::Post(post)
    }
}

impl From<Comment> for ContentItem {
    fn from(comment: Comment) -> Self {
        Self::Comment(comment)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_parses_raw_statuses() {
        assert_eq!(ApprovalState::from_raw("1"), ApprovalState::Approved);
        assert_eq!(ApprovalState::from_raw("0"), ApprovalState::Pending);
        assert_eq!(ApprovalState::from_raw("spam"), ApprovalState::Spam);
        assert_eq!(ApprovalState::from_raw("trash"), ApprovalState::Trash);
    }

    #[test]
    fn unknown_approval_status_is_pending() {
        assert_eq!(ApprovalState::from_raw("post-trashed"), ApprovalState::Pending);
        assert!(!ApprovalState::from_raw("").is_approved());
    }

    #[test]
    fn only_exact_one_is_approved() {
        for raw in ["approve", "approved", " 1 ", "1\n", "01", "true"] {
            assert_eq!(
                ApprovalState::from_raw(raw),
                ApprovalState::Pending,
                "{raw:?} parsed as approved"
            );
        }
    }

    #[test]
    fn approval_deserializes_from_raw_string() {
        let comment: Comment = serde_json::from_value(serde_json::json!({
            "id": 3,
            "post_id": 1,
            "approval": "1"
        }))
        .unwrap();
        assert!(comment.approval.is_approved());
        assert!(comment.is_top_level());
        assert_eq!(comment.author_name, "");
    }

    #[test]
    fn approval_serializes_to_raw_string() {
        let json = serde_json::to_value(ApprovalState::Spam).unwrap();
        assert_eq!(json, serde_json::json!("spam"));
    }

    #[test]
    fn other_content_has_no_id() {
        let item = ContentItem::Other {
            kind: "attachment".into(),
        };
        assert_eq!(item.id(), None);
        assert_eq!(item.kind_label(), "attachment");
    }
}
