//! Reaction handlers
//!
//! Like/dislike toggling on posts.

use axum::{
    extract::{Path, State},
    Json,
};
use blog_service::{
    ReactionService, ReactionSummaryResponse, ReactionToggleResponse, ToggleReactionRequest,
};

use crate::extractors::{AuthUser, OptionalAuthUser, PostIdPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Toggle a like or dislike
///
/// POST /posts/{post_id}/reactions  `{"type": "like" | "dislike"}`
pub async fn toggle_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<PostIdPath>,
    ValidatedJson(request): ValidatedJson<ToggleReactionRequest>,
) -> ApiResult<Json<ReactionToggleResponse>> {
    let post_id = path.post_id()?;

    let service = ReactionService::new(state.service_context());
    let response = service.toggle(post_id, auth.user_id, &request.kind).await?;
    Ok(Json(response))
}

/// Reaction counts and the caller's own reaction
///
/// GET /posts/{post_id}/reactions
pub async fn get_reactions(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(path): Path<PostIdPath>,
) -> ApiResult<Json<ReactionSummaryResponse>> {
    let post_id = path.post_id()?;

    let service = ReactionService::new(state.service_context());
    let response = service.summary(post_id, viewer.user_id()).await?;
    Ok(Json(response))
}
