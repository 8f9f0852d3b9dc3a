//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{Post, ReactionKind, ReactionSet, User};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Check if username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Persist profile changes (username, avatar, bio)
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;
}

// ============================================================================
// Post Repository
// ============================================================================

/// Pagination options for post queries
///
/// Without a cursor the newest posts come first. `before` pages towards older
/// posts, `after` towards newer ones.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub before: Option<Snowflake>,
    pub after: Option<Snowflake>,
    pub author_id: Option<Snowflake>,
    pub limit: i64,
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>>;

    /// List posts with cursor pagination, optionally filtered by author
    async fn list(&self, query: PostQuery) -> RepoResult<Vec<Post>>;

    async fn create(&self, post: &Post) -> RepoResult<()>;

    /// Persist content and image changes; reactions are not touched
    async fn update(&self, post: &Post) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Atomically apply [`ReactionSet::toggle`] to the stored post and return
    /// the resulting reaction set. Fails with `PostNotFound` for unknown posts.
    async fn toggle_reaction(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<ReactionSet>;
}
