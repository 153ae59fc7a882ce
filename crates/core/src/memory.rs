//! In-memory collaborators.
//!
//! [`InMemorySite`] answers every CMS lookup from plain maps and can be
//! loaded from a JSON snapshot; [`RecordingSink`] captures deliveries.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::collaborators::{
    CommentStore, DeliverySink, PostTitleLookup, TaxonomyLookup, UserDirectory,
};
use crate::content::Comment;
use crate::entity_types::EntityTypeTag;
use crate::error::LookupError;
use crate::message::{Message, Target};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// InMemorySite
// ---------------------------------------------------------------------------

/// Snapshot of the CMS data the pipeline reads.
///
/// ```json
/// {
///   "users": { "7": "Alice" },
///   "post_titles": { "42": "Hello" },
///   "terms": { "category": { "42": [3, 5] } },
///   "comments": [{ "id": 100, "post_id": 42, "approval": "1" }]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemorySite {
    /// User id to display name.
    pub users: HashMap<DbId, String>,
    /// Post id to title.
    pub post_titles: HashMap<DbId, String>,
    /// Taxonomy name to object id to attached term ids.
    pub terms: HashMap<String, HashMap<DbId, Vec<DbId>>>,
    /// Taxonomies whose lookups fail.
    pub unavailable_taxonomies: HashSet<String>,
    pub comments: Vec<Comment>,
}

impl InMemorySite {
    pub fn with_user(mut self, user_id: DbId, display_name: impl Into<String>) -> Self {
        self.users.insert(user_id, display_name.into());
        self
    }

    pub fn with_post_title(mut self, post_id: DbId, title: impl Into<String>) -> Self {
        self.post_titles.insert(post_id, title.into());
        self
    }

    pub fn with_terms(
        mut self,
        taxonomy: impl Into<String>,
        object_id: DbId,
        term_ids: Vec<DbId>,
    ) -> Self {
        self.terms
            .entry(taxonomy.into())
            .or_default()
            .insert(object_id, term_ids);
        self
    }

    pub fn with_unavailable_taxonomy(mut self, taxonomy: impl Into<String>) -> Self {
        self.unavailable_taxonomies.insert(taxonomy.into());
        self
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.retain(|c| c.id != comment.id);
        self.comments.push(comment);
        self
    }
}

impl UserDirectory for InMemorySite {
    fn display_name(&self, user_id: DbId) -> Option<String> {
        self.users.get(&user_id).cloned()
    }
}

impl PostTitleLookup for InMemorySite {
    fn post_title(&self, post_id: DbId) -> Option<String> {
        self.post_titles.get(&post_id).cloned()
    }
}

impl TaxonomyLookup for InMemorySite {
    fn terms_for(
        &self,
        object_id: DbId,
        taxonomy: &EntityTypeTag,
    ) -> Result<Vec<DbId>, LookupError> {
        if self.unavailable_taxonomies.contains(taxonomy.as_str()) {
            return Err(LookupError::Unavailable(taxonomy.to_string()));
        }

        let by_object = self
            .terms
            .get(taxonomy.as_str())
            .ok_or_else(|| LookupError::UnknownTaxonomy(taxonomy.to_string()))?;

        Ok(by_object.get(&object_id).cloned().unwrap_or_default())
    }
}

impl CommentStore for InMemorySite {
    fn comment(&self, comment_id: DbId) -> Option<Comment> {
        self.comments.iter().find(|c| c.id == comment_id).cloned()
    }
}

// ---------------------------------------------------------------------------
// RecordingSink
// ---------------------------------------------------------------------------

/// One captured call to [`DeliverySink::deliver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDelivery {
    pub object_type: EntityTypeTag,
    pub message: Message,
    pub targets: Vec<Target>,
}

/// Delivery sink that keeps everything it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    deliveries: Mutex<Vec<RecordedDelivery>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the deliveries received so far.
    pub fn deliveries(&self) -> Vec<RecordedDelivery> {
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DeliverySink for RecordingSink {
    fn deliver(&self, object_type: &EntityTypeTag, message: &Message, targets: &[Target]) {
        let record = RecordedDelivery {
            object_type: object_type.clone(),
            message: message.clone(),
            targets: targets.to_vec(),
        };
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ApprovalState;

    #[test]
    fn snapshot_deserializes_integer_keys() {
        let site: InMemorySite = serde_json::from_value(serde_json::json!({
            "users": { "7": "Alice" },
            "post_titles": { "42": "Hello" },
            "terms": { "category": { "42": [3, 5] } },
            "comments": [{ "id": 100, "post_id": 42, "approval": "1" }]
        }))
        .unwrap();

        assert_eq!(site.display_name(7).as_deref(), Some("Alice"));
        assert_eq!(site.post_title(42).as_deref(), Some("Hello"));
        assert_eq!(
            site.terms_for(42, &EntityTypeTag::new("category")).unwrap(),
            vec![3, 5]
        );
        assert_eq!(site.comment(100).map(|c| c.approval), Some(ApprovalState::Approved));
    }

    #[test]
    fn empty_snapshot_is_valid() {
        let site: InMemorySite = serde_json::from_str("{}").unwrap();
        assert!(site.comment(1).is_none());
        assert_eq!(site.display_name(1), None);
    }

    #[test]
    fn unknown_and_unavailable_taxonomies_error() {
        let site = InMemorySite::default()
            .with_terms("tag", 1, vec![2])
            .with_unavailable_taxonomy("tag");
        assert_eq!(
            site.terms_for(1, &EntityTypeTag::new("tag")),
            Err(LookupError::Unavailable("tag".into()))
        );
        assert_eq!(
            site.terms_for(1, &EntityTypeTag::new("category")),
            Err(LookupError::UnknownTaxonomy("category".into()))
        );
    }

    #[test]
    fn with_comment_replaces_same_id() {
        let comment = Comment {
            id: 1,
            user_id: 0,
            author_name: String::new(),
            parent_id: 0,
            post_id: 2,
            body: "first".into(),
            approval: ApprovalState::Pending,
        };
        let site = InMemorySite::default()
            .with_comment(comment.clone())
            .with_comment(Comment {
                body: "second".into(),
                ..comment
            });
        assert_eq!(site.comments.len(), 1);
        assert_eq!(site.comment(1).map(|c| c.body), Some("second".to_string()));
    }

    #[test]
    fn recording_sink_keeps_deliveries_in_order() {
        let sink = RecordingSink::new();
        let message = Message {
            id: 1,
            user_id: 0,
            username: "Anonymous".into(),
            title: None,
            content: String::new(),
            section_title: None,
            post_title: None,
        };
        sink.deliver(&EntityTypeTag::new("post"), &message, &[]);
        sink.deliver(&EntityTypeTag::new("comment"), &message, &[]);

        let kinds: Vec<_> = sink
            .deliveries()
            .into_iter()
            .map(|d| d.object_type.to_string())
            .collect();
        assert_eq!(kinds, vec!["post", "comment"]);
    }
}
