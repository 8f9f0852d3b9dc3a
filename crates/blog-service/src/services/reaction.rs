//! Reaction service
//!
//! Likes and dislikes are exclusive per user: toggling the current reaction
//! removes it, toggling the other kind switches over.

use blog_core::{DomainError, ReactionKind, Snowflake};
use tracing::{info, instrument};

use crate::dto::{ReactionSummaryResponse, ReactionToggleResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Toggle `kind` ("like" or "dislike") for `user_id` on a post
    #[instrument(skip(self))]
    pub async fn toggle(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        kind: &str,
    ) -> ServiceResult<ReactionToggleResponse> {
        let kind: ReactionKind = kind.parse()?;

        let reactions = self
            .ctx
            .post_repo()
            .toggle_reaction(post_id, user_id, kind)
            .await?;
        let me = reactions.state_of(user_id);

        info!(post_id = %post_id, user_id = %user_id, kind = %kind, ?me, "Reaction toggled");

        Ok(ReactionToggleResponse {
            post_id,
            kind,
            active: me == Some(kind),
            me,
            likes: reactions.likes(),
            dislikes: reactions.dislikes(),
        })
    }

    #[instrument(skip(self))]
    pub async fn summary(
        &self,
        post_id: Snowflake,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<ReactionSummaryResponse> {
        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;

        Ok(ReactionSummaryResponse::new(post.id, post.reactions, viewer))
    }
}
