//! Entity type tags and the deployment-configured registry of them.
//!
//! The subscription space is keyed by `(entity type, id)`. The actual type
//! names are deployment specific (a site may file posts under `"article"`
//! and sections under `"category"` or a custom taxonomy), so the core only
//! ever asks the registry for "the post type", "the comment type" and
//! "the section type".

use serde::{Deserialize, Serialize};

use crate::collaborators::EntityTypeRegistry;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// The three roles an entity type can play in the subscription space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Post,
    Comment,
    Section,
}

impl EntityKind {
    /// Return the wire-format string for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
            Self::Section => "section",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityTypeTag
// ---------------------------------------------------------------------------

/// A deployment-specific entity type name, e.g. `"post"` or `"category"`.
///
/// The empty tag means "unknown" and is what classification returns for
/// content that is neither a post nor a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityTypeTag(String);

impl EntityTypeTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The "unknown" tag.
    pub fn unknown() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for EntityTypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityTypeTag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// EntityTypes
// ---------------------------------------------------------------------------

/// Default post type name.
pub const DEFAULT_POST_TYPE: &str = "post";

/// Default comment type name.
pub const DEFAULT_COMMENT_TYPE: &str = "comment";

/// Default section taxonomy name.
pub const DEFAULT_SECTION_TYPE: &str = "category";

/// Static entity type registry, usually loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypes {
    pub post: EntityTypeTag,
    pub comment: EntityTypeTag,
    pub section: EntityTypeTag,
}

impl EntityTypes {
    /// Load the type names from environment variables with defaults.
    ///
    /// | Env Var             | Default    |
    /// |---------------------|------------|
    /// | `PUSH_POST_TYPE`    | `post`     |
    /// | `PUSH_COMMENT_TYPE` | `comment`  |
    /// | `PUSH_SECTION_TYPE` | `category` |
    pub fn from_env() -> Result<Self, CoreError> {
        let read = |var: &str, default: &str| {
            std::env::var(var).unwrap_or_else(|_| default.to_string())
        };

        let types = Self {
            post: EntityTypeTag::new(read("PUSH_POST_TYPE", DEFAULT_POST_TYPE)),
            comment: EntityTypeTag::new(read("PUSH_COMMENT_TYPE", DEFAULT_COMMENT_TYPE)),
            section: EntityTypeTag::new(read("PUSH_SECTION_TYPE", DEFAULT_SECTION_TYPE)),
        };
        types.validate()?;
        Ok(types)
    }

    /// Every tag must be non-empty and the three must be distinct, otherwise
    /// targets of different kinds would collide in the subscription space.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (kind, tag) in [
            (EntityKind::Post, &self.post),
            (EntityKind::Comment, &self.comment),
            (EntityKind::Section, &self.section),
        ] {
            if tag.is_unknown() {
                return Err(CoreError::Validation(format!(
                    "Entity type for '{kind}' must not be empty"
                )));
            }
        }

        if self.post == self.comment || self.post == self.section || self.comment == self.section
        {
            return Err(CoreError::Validation(format!(
                "Entity types must be distinct, got post='{}', comment='{}', section='{}'",
                self.post, self.comment, self.section
            )));
        }

        Ok(())
    }
}

impl Default for EntityTypes {
    fn default() -> Self {
        Self {
            post: EntityTypeTag::new(DEFAULT_POST_TYPE),
            comment: EntityTypeTag::new(DEFAULT_COMMENT_TYPE),
            section: EntityTypeTag::new(DEFAULT_SECTION_TYPE),
        }
    }
}

impl EntityTypeRegistry for EntityTypes {
    fn entity_type(&self, kind: EntityKind) -> EntityTypeTag {
        match kind {
            EntityKind::Post => self.post.clone(),
            EntityKind::Comment => self.comment.clone(),
            EntityKind::Section => self.section.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
