//! Post database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the `posts` table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub author_id: i64,
    pub content: String,
    pub image_url: Option<String>,
    pub image_key: Option<String>,
    pub liked_by: Vec<i64>,
    pub disliked_by: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Reaction columns of a post, locked during a toggle
#[derive(Debug, Clone, FromRow)]
pub struct ReactionListsModel {
    pub liked_by: Vec<i64>,
    pub disliked_by: Vec<i64>,
}
