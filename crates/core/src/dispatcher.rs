//! Orchestrates gate, normalizer and target resolver for one event.
//!
//! [`EventDispatcher`] is what the CMS host calls from its insert hooks. It
//! is synchronous: each event is gated, normalized, resolved and handed to
//! the [`DeliverySink`] before the call returns. Retries and queueing are
//! the sink's business.

use std::sync::Arc;

use crate::collaborators::{
    CommentStore, ContentSanitizer, DeliverySink, EntityTypeRegistry, PostTitleLookup,
    TaxonomyLookup, UserDirectory,
};
use crate::content::{ContentItem, Post};
use crate::entity_types::{EntityKind, EntityTypeTag};
use crate::error::CoreError;
use crate::gate::{InsertContext, InsertionGate, LifecycleEvent};
use crate::memory::InMemorySite;
use crate::normalizer::Normalizer;
use crate::targets::TargetResolver;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// The CMS-side services a dispatcher reads from.
#[derive(Clone)]
pub struct Collaborators {
    pub registry: Arc<dyn EntityTypeRegistry>,
    pub directory: Arc<dyn UserDirectory>,
    pub taxonomy: Arc<dyn TaxonomyLookup>,
    pub sanitizer: Arc<dyn ContentSanitizer>,
    pub titles: Arc<dyn PostTitleLookup>,
    pub comments: Arc<dyn CommentStore>,
}

impl Collaborators {
    /// Serve every lookup from one in-memory site.
    pub fn from_site(
        site: Arc<InMemorySite>,
        registry: Arc<dyn EntityTypeRegistry>,
        sanitizer: Arc<dyn ContentSanitizer>,
    ) -> Self {
        Self {
            registry,
            directory: site.clone(),
            taxonomy: site.clone(),
            sanitizer,
            titles: site.clone(),
            comments: site,
        }
    }
}

// ---------------------------------------------------------------------------
// DispatchOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The gate rejected the event; nothing was delivered.
    Skipped,
    /// A message was handed to the sink with this many targets.
    Delivered { targets: usize },
}

// ---------------------------------------------------------------------------
// EventDispatcher
// ---------------------------------------------------------------------------

pub struct EventDispatcher {
    collaborators: Collaborators,
    sink: Arc<dyn DeliverySink>,
}

impl EventDispatcher {
    pub fn new(collaborators: Collaborators, sink: Arc<dyn DeliverySink>) -> Self {
        Self {
            collaborators,
            sink,
        }
    }

    pub fn gate(&self) -> InsertionGate<'_> {
        InsertionGate::new(self.collaborators.registry.as_ref())
    }

    pub fn normalizer(&self) -> Normalizer<'_> {
        Normalizer::new(
            self.collaborators.directory.as_ref(),
            self.collaborators.sanitizer.as_ref(),
            self.collaborators.titles.as_ref(),
        )
    }

    pub fn target_resolver(&self) -> TargetResolver<'_> {
        TargetResolver::new(
            self.collaborators.registry.as_ref(),
            self.collaborators.taxonomy.as_ref(),
        )
    }

    /// Entity type the delivery side uses to route `item`; the empty tag for
    /// anything that is neither a post nor a comment.
    pub fn classify(&self, item: &ContentItem) -> EntityTypeTag {
        let registry = &self.collaborators.registry;
        match item {
            ContentItem::Post(_) => registry.entity_type(EntityKind::Post),
            ContentItem::Comment(_) => registry.entity_type(EntityKind::Comment),
            ContentItem::Other { .. } => EntityTypeTag::unknown(),
        }
    }

    /// Gate, normalize, resolve and deliver one event.
    ///
    /// A rejected event is [`DispatchOutcome::Skipped`], not an error.
    pub fn dispatch(
        &self,
        event: &LifecycleEvent,
        item: &ContentItem,
    ) -> Result<DispatchOutcome, CoreError> {
        if !self.gate().should_process(event) {
            tracing::debug!(
                kind = ?event.kind,
                object = item.kind_label(),
                object_id = ?item.id(),
                "Lifecycle event rejected by gate"
            );
            return Ok(DispatchOutcome::Skipped);
        }

        let message = self.normalizer().normalize(item)?;
        let targets = self.target_resolver().resolve_targets(item);
        let object_type = self.classify(item);

        self.sink.deliver(&object_type, &message, &targets);

        tracing::info!(
            object_type = %object_type,
            object_id = message.id,
            targets = targets.len(),
            "Push message dispatched"
        );

        Ok(DispatchOutcome::Delivered {
            targets: targets.len(),
        })
    }

    /// Entry point for the host's "post inserted" hook.
    pub fn on_post_inserted(
        &self,
        post: Post,
        ctx: InsertContext,
    ) -> Result<DispatchOutcome, CoreError> {
        let event = LifecycleEvent::post_inserted(&post, &ctx);
        self.dispatch(&event, &ContentItem::Post(post))
    }

    /// Entry point for the host's "comment inserted" hook.
    ///
    /// The comment is re-read from the store so moderation status reflects
    /// what was actually saved.
    pub fn on_comment_inserted(
        &self,
        comment_id: DbId,
        ctx: InsertContext,
    ) -> Result<DispatchOutcome, CoreError> {
        let Some(comment) = self.collaborators.comments.comment(comment_id) else {
            tracing::debug!(comment_id, "Inserted comment not found in store");
            return Ok(DispatchOutcome::Skipped);
        };

        let event = LifecycleEvent::comment_inserted(Some(&comment), &ctx);
        self.dispatch(&event, &ContentItem::Comment(comment))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
