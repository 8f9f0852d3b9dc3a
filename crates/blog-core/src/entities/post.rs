//! Post entity - a piece of text with an optional image and its reactions

use chrono::{DateTime, Utc};

use crate::entities::reaction::ReactionSet;
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    /// Public URL of the attached image
    pub image_url: Option<String>,
    /// Storage key of an image we uploaded ourselves; `None` for external URLs
    pub image_key: Option<String>,
    pub reactions: ReactionSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub const MAX_CONTENT_LENGTH: usize = 10_000;

    pub fn new(id: Snowflake, author_id: Snowflake, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            author_id,
            content,
            image_url: None,
            image_key: None,
            reactions: ReactionSet::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    #[inline]
    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }

    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at
    }

    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }

    /// Replace the image, returning the storage key of the previous one
    pub fn set_image(&mut self, url: Option<String>, key: Option<String>) -> Option<String> {
        self.image_url = url;
        self.updated_at = Utc::now();
        std::mem::replace(&mut self.image_key, key)
    }
}
