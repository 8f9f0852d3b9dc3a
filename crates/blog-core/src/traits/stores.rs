//! Store traits for sessions, images and health probes

use async_trait::async_trait;

use crate::entities::{ImageUpload, RefreshSession, StoredImage};
use crate::traits::RepoResult;
use crate::value_objects::Snowflake;

/// Server-side refresh token sessions
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Store a session under `token_id`, expiring after `ttl_seconds`
    async fn store(
        &self,
        token_id: &str,
        session: &RefreshSession,
        ttl_seconds: u64,
    ) -> RepoResult<()>;

    /// Look up a live session
    async fn get(&self, token_id: &str) -> RepoResult<Option<RefreshSession>>;

    /// Remove one session, returning whether it existed
    async fn revoke(&self, token_id: &str) -> RepoResult<bool>;

    /// Remove every session of a user, returning how many were removed
    async fn revoke_all_for_user(&self, user_id: Snowflake) -> RepoResult<u32>;
}

/// Object storage for post images
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Largest accepted image in bytes
    fn max_size(&self) -> usize;

    async fn put(&self, upload: ImageUpload) -> RepoResult<StoredImage>;

    async fn delete(&self, key: &str) -> RepoResult<()>;
}

/// Readiness probe for a backing service
#[async_trait]
pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self) -> RepoResult<()>;
}
