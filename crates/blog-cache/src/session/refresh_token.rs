//! Refresh token sessions in Redis.
//!
//! Layout:
//! - `refresh_token:{jti}` holds the JSON-encoded session with a TTL
//! - `user_tokens:{user_id}` is a set of the user's live token ids, used to
//!   revoke every session at once

use async_trait::async_trait;
use redis::AsyncCommands;

use blog_core::entities::RefreshSession;
use blog_core::traits::{RepoResult, TokenStore};
use blog_core::value_objects::Snowflake;

use crate::pool::{RedisPool, RedisPoolError, RedisResult};

const REFRESH_TOKEN_PREFIX: &str = "refresh_token:";
const USER_TOKENS_PREFIX: &str = "user_tokens:";

#[derive(Clone)]
pub struct RedisTokenStore {
    pool: RedisPool,
}

impl RedisTokenStore {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(token_id: &str) -> String {
        format!("{REFRESH_TOKEN_PREFIX}{token_id}")
    }

    fn user_key(user_id: Snowflake) -> String {
        format!("{USER_TOKENS_PREFIX}{user_id}")
    }

    async fn store_session(
        &self,
        token_id: &str,
        session: &RefreshSession,
        ttl_seconds: u64,
    ) -> RedisResult<()> {
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .filter(|ttl| *ttl > 0)
            .ok_or(RedisPoolError::InvalidTtl(ttl_seconds))?;

        self.pool
            .set(&Self::key(token_id), session, Some(ttl_seconds))
            .await?;

        let user_key = Self::user_key(session.user_id);
        let mut conn = self.pool.get().await?;
        conn.sadd::<_, _, ()>(&user_key, token_id).await?;
        conn.expire::<_, ()>(&user_key, ttl).await?;

        tracing::debug!(
            user_id = %session.user_id,
            session_id = %session.session_id,
            "Stored refresh session"
        );
        Ok(())
    }

    async fn revoke_session(&self, token_id: &str) -> RedisResult<bool> {
        if let Some(session) = self
            .pool
            .get_value::<RefreshSession>(&Self::key(token_id))
            .await?
        {
            let mut conn = self.pool.get().await?;
            conn.srem::<_, _, ()>(Self::user_key(session.user_id), token_id)
                .await?;
        }

        let deleted = self.pool.delete(&Self::key(token_id)).await?;
        if deleted {
            tracing::debug!("Revoked refresh session");
        }
        Ok(deleted)
    }

    async fn revoke_user(&self, user_id: Snowflake) -> RedisResult<u32> {
        let user_key = Self::user_key(user_id);
        let mut conn = self.pool.get().await?;

        let token_ids: Vec<String> = conn.smembers(&user_key).await?;
        let keys: Vec<String> = token_ids.iter().map(|id| Self::key(id)).collect();
        let removed = self.pool.delete_many(&keys).await?;
        conn.del::<_, ()>(&user_key).await?;

        tracing::info!(user_id = %user_id, count = removed, "Revoked all refresh sessions");
        Ok(u32::try_from(removed).unwrap_or(0))
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn store(
        &self,
        token_id: &str,
        session: &RefreshSession,
        ttl_seconds: u64,
    ) -> RepoResult<()> {
        Ok(self.store_session(token_id, session, ttl_seconds).await?)
    }

    async fn get(&self, token_id: &str) -> RepoResult<Option<RefreshSession>> {
        Ok(self.pool.get_value(&Self::key(token_id)).await?)
    }

    async fn revoke(&self, token_id: &str) -> RepoResult<bool> {
        Ok(self.revoke_session(token_id).await?)
    }

    async fn revoke_all_for_user(&self, user_id: Snowflake) -> RepoResult<u32> {
        Ok(self.revoke_user(user_id).await?)
    }
}
