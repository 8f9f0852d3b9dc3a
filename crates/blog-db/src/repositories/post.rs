//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blog_core::entities::{Post, ReactionKind, ReactionSet};
use blog_core::traits::{PostQuery, PostRepository, RepoResult};
use blog_core::value_objects::Snowflake;

use crate::mappers::snowflakes_to_ids;
use crate::models::{PostModel, ReactionListsModel};

use super::error::{map_db_error, post_not_found};

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, author_id, content, image_url, image_key, liked_by, disliked_by,
                   created_at, updated_at, deleted_at
            FROM posts
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, query: PostQuery) -> RepoResult<Vec<Post>> {
        let limit = query.limit.clamp(1, 100);
        let author = query.author_id.map(Snowflake::into_inner);

        let results = match (query.before, query.after) {
            (None, Some(after)) => {
                // Oldest-first so LIMIT keeps the posts closest to the cursor
                sqlx::query_as::<_, PostModel>(
                    r"
                    SELECT id, author_id, content, image_url, image_key, liked_by, disliked_by,
                           created_at, updated_at, deleted_at
                    FROM posts
                    WHERE id > $1 AND ($2::BIGINT IS NULL OR author_id = $2) AND deleted_at IS NULL
                    ORDER BY id ASC
                    LIMIT $3
                    ",
                )
                .bind(after.into_inner())
                .bind(author)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
                .map(|mut rows| {
                    rows.reverse();
                    rows
                })
            }
            (before, after) => {
                // With both cursors, pages newest first inside the window
                sqlx::query_as::<_, PostModel>(
                    r"
                    SELECT id, author_id, content, image_url, image_key, liked_by, disliked_by,
                           created_at, updated_at, deleted_at
                    FROM posts
                    WHERE ($1::BIGINT IS NULL OR id < $1)
                      AND ($4::BIGINT IS NULL OR id > $4)
                      AND ($2::BIGINT IS NULL OR author_id = $2)
                      AND deleted_at IS NULL
                    ORDER BY id DESC
                    LIMIT $3
                    ",
                )
                .bind(before.map(Snowflake::into_inner))
                .bind(author)
                .bind(limit)
                .bind(after.map(Snowflake::into_inner))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn create(&self, post: &Post) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO posts (id, author_id, content, image_url, image_key, liked_by, disliked_by,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(post.id.into_inner())
        .bind(post.author_id.into_inner())
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.image_key)
        .bind(snowflakes_to_ids(&post.reactions.liked_by))
        .bind(snowflakes_to_ids(&post.reactions.disliked_by))
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn update(&self, post: &Post) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE posts
            SET content = $2, image_url = $3, image_key = $4, updated_at = $5
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(post.id.into_inner())
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.image_key)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(post_not_found(post.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE posts
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(post_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn toggle_reaction(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<ReactionSet> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row lock serializes concurrent toggles on the same post
        let lists = sqlx::query_as::<_, ReactionListsModel>(
            r"
            SELECT liked_by, disliked_by
            FROM posts
            WHERE id = $1 AND deleted_at IS NULL
            FOR UPDATE
            ",
        )
        .bind(post_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| post_not_found(post_id))?;

        let mut reactions = ReactionSet::from(lists);
        let outcome = reactions.toggle(user_id, kind);

        sqlx::query(
            r"
            UPDATE posts
            SET liked_by = $2, disliked_by = $3
            WHERE id = $1
            ",
        )
        .bind(post_id.into_inner())
        .bind(snowflakes_to_ids(&reactions.liked_by))
        .bind(snowflakes_to_ids(&reactions.disliked_by))
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        tracing::debug!(
            ?outcome,
            likes = reactions.likes(),
            dislikes = reactions.dislikes(),
            "Reaction toggled"
        );
        Ok(reactions)
    }
}
