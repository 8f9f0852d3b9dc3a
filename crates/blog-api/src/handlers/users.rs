//! User handlers
//!
//! Profiles and per-author post listings.

use axum::{
    extract::{Path, State},
    Json,
};
use blog_service::{
    CurrentUserResponse, PostResponse, PostService, UpdateUserRequest, UserResponse, UserService,
};

use crate::extractors::{AuthUser, OptionalAuthUser, Pagination, UserIdPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Get the current user
///
/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let user = service.get_current(auth.user_id).await?;
    Ok(Json(user))
}

/// Update the current user's profile
///
/// PATCH /users/@me
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let user = service.update_current(auth.user_id, request).await?;
    Ok(Json(user))
}

/// Get a public profile
///
/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = path.user_id()?;

    let service = UserService::new(state.service_context());
    let user = service.get_user(user_id).await?;
    Ok(Json(user))
}

/// List a user's posts, newest first
///
/// GET /users/{user_id}/posts
pub async fn get_user_posts(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(path): Path<UserIdPath>,
    pagination: Pagination,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let user_id = path.user_id()?;

    // Unknown authors are a 404 rather than an empty page
    UserService::new(state.service_context())
        .get_user(user_id)
        .await?;

    let service = PostService::new(state.service_context());
    let posts = service
        .list(pagination.into_query(Some(user_id)), viewer.user_id())
        .await?;
    Ok(Json(posts))
}
