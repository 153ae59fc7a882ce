//! Computes the subscription targets a message fans out to.
//!
//! - A post goes to every section (taxonomy term) it is filed under.
//! - A top-level comment goes to the post's subscribers.
//! - A reply goes to the parent comment's subscribers only.

use crate::collaborators::{EntityTypeRegistry, TaxonomyLookup};
use crate::content::{Comment, ContentItem, Post};
use crate::entity_types::EntityKind;
use crate::message::Target;

pub struct TargetResolver<'a> {
    registry: &'a dyn EntityTypeRegistry,
    taxonomy: &'a dyn TaxonomyLookup,
}

impl<'a> TargetResolver<'a> {
    pub fn new(registry: &'a dyn EntityTypeRegistry, taxonomy: &'a dyn TaxonomyLookup) -> Self {
        Self { registry, taxonomy }
    }

    /// Ordered targets for `item`. Unknown content kinds yield no targets.
    pub fn resolve_targets(&self, item: &ContentItem) -> Vec<Target> {
        match item {
            ContentItem::Post(post) => self.post_targets(post),
            ContentItem::Comment(comment) => vec![self.comment_target(comment)],
            ContentItem::Other { .. } => Vec::new(),
        }
    }

    /// One section target per term, in the order the taxonomy returns them.
    ///
    /// A failed term lookup yields no targets; the post's message is still
    /// delivered by the caller.
    pub fn post_targets(&self, post: &Post) -> Vec<Target> {
        if self.registry.entity_type(EntityKind::Post).as_str() != post.post_type {
            return Vec::new();
        }

        let section = self.registry.entity_type(EntityKind::Section);
        match self.taxonomy.terms_for(post.id, &section) {
            Ok(term_ids) => term_ids
                .into_iter()
                .map(|term_id| Target::new(section.clone(), term_id))
                .collect(),
            Err(e) => {
                tracing::warn!(
                    post_id = post.id,
                    taxonomy = %section,
                    error = %e,
                    "Section lookup failed, post will fan out to no sections"
                );
                Vec::new()
            }
        }
    }

    pub fn comment_target(&self, comment: &Comment) -> Target {
        if comment.is_top_level() {
            Target::new(self.registry.entity_type(EntityKind::Post), comment.post_id)
        } else {
            Target::new(
                self.registry.entity_type(EntityKind::Comment),
                comment.parent_id,
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
