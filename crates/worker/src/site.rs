//! Mutable view of the CMS data the worker has seen.
//!
//! Starts from an optional JSON snapshot and is updated as hook records
//! arrive, so a comment inserted after its post still resolves the post
//! title.

use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use pushsource_core::collaborators::{
    CommentStore, PostTitleLookup, TaxonomyLookup, UserDirectory,
};
use pushsource_core::types::DbId;
use pushsource_core::{Comment, EntityTypeTag, InMemorySite, LookupError, Post};

use crate::error::WorkerError;

#[derive(Debug, Default)]
pub struct SharedSite {
    inner: RwLock<InMemorySite>,
}

impl SharedSite {
    pub fn new(site: InMemorySite) -> Self {
        Self {
            inner: RwLock::new(site),
        }
    }

    /// Load the snapshot at `path`.
    pub async fn load(path: &Path) -> Result<Self, WorkerError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| WorkerError::SnapshotIo {
                path: path.to_path_buf(),
                source,
            })?;
        let site: InMemorySite =
            serde_json::from_slice(&bytes).map_err(|source| WorkerError::SnapshotParse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(
            path = %path.display(),
            users = site.users.len(),
            posts = site.post_titles.len(),
            comments = site.comments.len(),
            "Site snapshot loaded"
        );
        Ok(Self::new(site))
    }

    /// Remember a post's title for later comment notifications.
    pub fn record_post(&self, post: &Post) {
        let mut site = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        site.post_titles.insert(post.id, post.title.clone());
    }

    /// Insert or replace a stored comment.
    pub fn record_comment(&self, comment: Comment) {
        let mut site = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        site.comments.retain(|c| c.id != comment.id);
        site.comments.push(comment);
    }

    fn read(&self) -> RwLockReadGuard<'_, InMemorySite> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UserDirectory for SharedSite {
    fn display_name(&self, user_id: DbId) -> Option<String> {
        self.read().display_name(user_id)
    }
}

impl PostTitleLookup for SharedSite {
    fn post_title(&self, post_id: DbId) -> Option<String> {
        self.read().post_title(post_id)
    }
}

impl TaxonomyLookup for SharedSite {
    fn terms_for(
        &self,
        object_id: DbId,
        taxonomy: &EntityTypeTag,
    ) -> Result<Vec<DbId>, LookupError> {
        self.read().terms_for(object_id, taxonomy)
    }
}

impl CommentStore for SharedSite {
    fn comment(&self, comment_id: DbId) -> Option<Comment> {
        self.read().comment(comment_id)
    }
}
