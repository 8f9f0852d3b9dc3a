//! PostgreSQL readiness probe

use async_trait::async_trait;
use sqlx::PgPool;

use blog_core::traits::{HealthCheck, RepoResult};

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgHealthCheck {
    pool: PgPool,
}

impl PgHealthCheck {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PgHealthCheck {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn check(&self) -> RepoResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
