//! Post handlers
//!
//! Create and update accept either JSON or `multipart/form-data`.

use axum::{
    extract::{Path, State},
    Json,
};
use blog_service::{CreatePostRequest, PostResponse, PostService, UpdatePostRequest};

use crate::extractors::{AuthUser, OptionalAuthUser, Pagination, PostFilter, PostForm, PostIdPath};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// List posts, newest first
///
/// GET /posts?before&after&limit&author_id
pub async fn list_posts(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    pagination: Pagination,
    filter: PostFilter,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let posts = service
        .list(pagination.into_query(filter.author_id), viewer.user_id())
        .await?;
    Ok(Json(posts))
}

/// Create a post
///
/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    form: PostForm<CreatePostRequest>,
) -> ApiResult<Created<Json<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let post = service.create(auth.user_id, form.into_inner()).await?;
    Ok(Created(Json(post)))
}

/// Get a post
///
/// GET /posts/{post_id}
pub async fn get_post(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(path): Path<PostIdPath>,
) -> ApiResult<Json<PostResponse>> {
    let post_id = path.post_id()?;

    let service = PostService::new(state.service_context());
    let post = service.get(post_id, viewer.user_id()).await?;
    Ok(Json(post))
}

/// Edit a post (author only)
///
/// PATCH /posts/{post_id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<PostIdPath>,
    form: PostForm<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    let post_id = path.post_id()?;

    let service = PostService::new(state.service_context());
    let post = service
        .update(post_id, auth.user_id, form.into_inner())
        .await?;
    Ok(Json(post))
}

/// Delete a post (author only)
///
/// DELETE /posts/{post_id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<PostIdPath>,
) -> ApiResult<NoContent> {
    let post_id = path.post_id()?;

    let service = PostService::new(state.service_context());
    service.delete(post_id, auth.user_id).await?;
    Ok(NoContent)
}
