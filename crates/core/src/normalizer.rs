//! Builds the canonical [`Message`] for a post or comment.

use crate::collaborators::{ContentSanitizer, PostTitleLookup, UserDirectory};
use crate::content::{Comment, ContentItem, Post};
use crate::error::CoreError;
use crate::message::{Message, ANONYMOUS_USERNAME};
use crate::types::DbId;

/// Pure function of the content item plus the directory, sanitizer and title
/// lookups it borrows.
pub struct Normalizer<'a> {
    directory: &'a dyn UserDirectory,
    sanitizer: &'a dyn ContentSanitizer,
    titles: &'a dyn PostTitleLookup,
}

impl<'a> Normalizer<'a> {
    pub fn new(
        directory: &'a dyn UserDirectory,
        sanitizer: &'a dyn ContentSanitizer,
        titles: &'a dyn PostTitleLookup,
    ) -> Self {
        Self {
            directory,
            sanitizer,
            titles,
        }
    }

    /// Normalize any content item.
    ///
    /// Fails with [`CoreError::InvalidContentKind`] for anything that is not
    /// a post or a comment.
    pub fn normalize(&self, item: &ContentItem) -> Result<Message, CoreError> {
        match item {
            ContentItem::Post(post) => Ok(self.normalize_post(post)),
            ContentItem::Comment(comment) => Ok(self.normalize_comment(comment)),
            ContentItem::Other { kind } => Err(CoreError::InvalidContentKind(kind.clone())),
        }
    }

    pub fn normalize_post(&self, post: &Post) -> Message {
        let username = self
            .registered_name(post.author_id)
            .unwrap_or_else(|| ANONYMOUS_USERNAME.to_string());

        Message {
            id: post.id,
            user_id: post.author_id,
            username,
            title: Some(post.title.clone()),
            content: self.sanitizer.render(&post.body),
            section_title: None,
            post_title: None,
        }
    }

    pub fn normalize_comment(&self, comment: &Comment) -> Message {
        // Registered name, then the name a guest typed in, then the placeholder.
        let username = self
            .registered_name(comment.user_id)
            .or_else(|| non_empty(&comment.author_name))
            .unwrap_or_else(|| ANONYMOUS_USERNAME.to_string());

        Message {
            id: comment.id,
            user_id: comment.user_id,
            username,
            title: None,
            content: self.sanitizer.render(&comment.body),
            section_title: None,
            post_title: self.titles.post_title(comment.post_id),
        }
    }

    /// Directory name for a positive user id, ignoring blank names.
    fn registered_name(&self, user_id: DbId) -> Option<String> {
        if user_id <= 0 {
            return None;
        }
        self.directory
            .display_name(user_id)
            .and_then(|name| non_empty(&name))
    }
}

/// `name` unchanged, unless it is blank.
fn non_empty(name: &str) -> Option<String> {
    (!name.trim().is_empty()).then(|| name.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::content::ApprovalState;
    use crate::memory::InMemorySite;
    use crate::sanitizer::PlainTextSanitizer;

    fn site() -> InMemorySite {
        InMemorySite::default()
            .with_user(7, "Alice")
            .with_user(8, "   ")
            .with_post_title(42, "Hello")
    }

    fn post(author_id: DbId) -> Post {
        Post {
            id: 42,
            author_id,
            title: "Hello".into(),
            body: "<p>Hi</p>".into(),
            post_type: "post".into(),
        }
    }

    fn comment(user_id: DbId, author_name: &str) -> Comment {
        Comment {
            id: 100,
            user_id,
            author_name: author_name.into(),
            parent_id: 0,
            post_id: 42,
            body: "<b>Great</b> read".into(),
            approval: ApprovalState::Approved,
        }
    }

    fn normalize(item: ContentItem) -> Result<Message, CoreError> {
        let site = site();
        let sanitizer = PlainTextSanitizer::default();
        Normalizer::new(&site, &sanitizer, &site).normalize(&item)
    }

    #[test]
    fn post_with_known_author() {
        let message = normalize(post(7).into()).unwrap();
        assert_eq!(
            message,
            Message {
                id: 42,
                user_id: 7,
                username: "Alice".into(),
                title: Some("Hello".into()),
                content: "Hi".into(),
                section_title: None,
                post_title: None,
            }
        );
    }

    #[test]
    fn post_without_author_is_anonymous() {
        for author_id in [0, -1, -50] {
            let message = normalize(post(author_id).into()).unwrap();
            assert_eq!(message.username, ANONYMOUS_USERNAME);
            assert_eq!(message.user_id, author_id);
        }
    }

    #[test]
    fn post_with_unknown_author_is_anonymous() {
        let message = normalize(post(999).into()).unwrap();
        assert_eq!(message.username, ANONYMOUS_USERNAME);
    }

    #[test]
    fn blank_display_name_is_treated_as_missing() {
        let message = normalize(post(8).into()).unwrap();
        assert_eq!(message.username, ANONYMOUS_USERNAME);
    }

    #[test]
    fn comment_by_registered_user() {
        let message = normalize(comment(7, "ignored").into()).unwrap();
        assert_eq!(message.username, "Alice");
        assert_eq!(message.title, None);
        assert_eq!(message.content, "Great read");
        assert_eq!(message.post_title.as_deref(), Some("Hello"));
        assert_eq!(message.section_title, None);
    }

    #[test]
    fn guest_comment_uses_stored_author_name() {
        let message = normalize(comment(0, "Bob").into()).unwrap();
        assert_eq!(message.username, "Bob");
        assert_eq!(message.user_id, 0);
    }

    #[test]
    fn unknown_user_falls_back_to_stored_author_name() {
        let message = normalize(comment(999, "Bob").into()).unwrap();
        assert_eq!(message.username, "Bob");
    }

    #[test]
    fn names_are_passed_through_untrimmed() {
        let message = normalize(comment(0, "  Bob ").into()).unwrap();
        assert_eq!(message.username, "  Bob ");

        let site = InMemorySite::default().with_user(3, " Carol");
        let sanitizer = PlainTextSanitizer::default();
        let message = Normalizer::new(&site, &sanitizer, &site).normalize_post(&post(3));
        assert_eq!(message.username, " Carol");
    }

    #[test]
    fn guest_comment_without_name_is_anonymous() {
        let message = normalize(comment(0, "").into()).unwrap();
        assert_eq!(message.username, ANONYMOUS_USERNAME);
    }

    #[test]
    fn comment_on_unknown_post_has_no_post_title() {
        let mut orphan = comment(7, "");
        orphan.post_id = 5;
        let message = normalize(orphan.into()).unwrap();
        assert_eq!(message.post_title, None);
    }

    #[test]
    fn other_content_is_rejected() {
        let result = normalize(ContentItem::Other {
            kind: "attachment".into(),
        });
        assert_matches!(result, Err(CoreError::InvalidContentKind(kind)) if kind == "attachment");
    }
}
