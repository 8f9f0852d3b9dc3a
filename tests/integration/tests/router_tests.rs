//! Router tests over the in-memory backend
//!
//! Run with: cargo test -p integration-tests --test router_tests

use axum::http::{Method, StatusCode};
use blog_common::StorageProvider;
use blog_service::memory::MemoryBackend;
use integration_tests::{
    api, memory_config, AuthResponse, CreatePostRequest, LoginRequest, MultipartForm, PostResponse,
    ReactionToggleResponse, RegisterRequest, TestApp, ToggleReactionRequest, UserResponse,
    TINY_PNG,
};
use serde_json::json;

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_and_readiness() {
    let app = TestApp::new();

    let live = app.get("/health", None).await;
    live.expect_status(StatusCode::OK);
    assert_eq!(live.value()["status"], "healthy");

    let ready = app.get("/health/ready", None).await;
    ready.expect_status(StatusCode::OK);
    assert_eq!(ready.value()["checks"]["database"], "healthy");

    app.backend.database.set_healthy(false);
    let not_ready = app.get("/health/ready", None).await;
    not_ready.expect_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(not_ready.value()["status"], "not_ready");
    assert_eq!(not_ready.value()["checks"]["database"], "unhealthy");
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let app = TestApp::new();
    let response = app.get(&api("/posts"), None).await;
    response.expect_status(StatusCode::OK);
    assert!(response.headers.contains_key("x-request-id"));
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_register_login_and_current_user() {
    let app = TestApp::new();
    let registered = app.register("writer").await;
    assert_eq!(registered.token_type, "Bearer");
    assert_eq!(registered.user.email.as_deref(), Some("writer@example.com"));

    let login = app
        .post_json(
            &api("/auth/login"),
            None,
            &LoginRequest::from_register(&RegisterRequest::named("writer")),
        )
        .await;
    login.expect_status(StatusCode::OK);
    let login: AuthResponse = login.json();
    assert_eq!(login.user.id, registered.user.id);

    let me = app
        .get(&api("/users/@me"), Some(&login.access_token))
        .await;
    me.expect_status(StatusCode::OK);
    let me: UserResponse = me.json();
    assert_eq!(me.username, "writer");
    assert_eq!(me.email.as_deref(), Some("writer@example.com"));
}

#[tokio::test]
async fn test_register_duplicate_and_invalid() {
    let app = TestApp::new();
    app.register("writer").await;

    let duplicate = app
        .post_json(
            &api("/auth/register"),
            None,
            &RegisterRequest::named("writer"),
        )
        .await;
    duplicate.expect_status(StatusCode::CONFLICT);
    assert_eq!(duplicate.error_code(), "EMAIL_ALREADY_EXISTS");

    let short_password = app
        .post_json(
            &api("/auth/register"),
            None,
            &json!({"username": "other", "email": "other@example.com", "password": "short"}),
        )
        .await;
    short_password.expect_status(StatusCode::BAD_REQUEST);
    let body = short_password.value();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["password"].is_array());
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new();
    app.register("writer").await;

    let response = app
        .post_json(
            &api("/auth/login"),
            None,
            &json!({"email": "writer@example.com", "password": "WrongPass123!"}),
        )
        .await;
    response.expect_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_refresh_rotation_revokes_old_token() {
    let app = TestApp::new();
    let session = app.register("writer").await;

    let rotated = app
        .post_json(
            &api("/auth/refresh"),
            None,
            &json!({"refresh_token": session.refresh_token}),
        )
        .await;
    rotated.expect_status(StatusCode::OK);
    let rotated: AuthResponse = rotated.json();
    assert_ne!(rotated.refresh_token, session.refresh_token);

    let replayed = app
        .post_json(
            &api("/auth/refresh"),
            None,
            &json!({"refresh_token": session.refresh_token}),
        )
        .await;
    replayed.expect_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let app = TestApp::new();
    let session = app.register("writer").await;

    let logout = app
        .post_json(
            &api("/auth/logout"),
            Some(&session.access_token),
            &json!({"refresh_token": session.refresh_token}),
        )
        .await;
    logout.expect_status(StatusCode::NO_CONTENT);
    assert!(app.backend.tokens.is_empty());

    let refresh = app
        .post_json(
            &api("/auth/refresh"),
            None,
            &json!({"refresh_token": session.refresh_token}),
        )
        .await;
    refresh.expect_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_and_invalid_tokens() {
    let app = TestApp::new();

    let missing = app.get(&api("/users/@me"), None).await;
    missing.expect_status(StatusCode::UNAUTHORIZED);
    assert_eq!(missing.error_code(), "MISSING_AUTHORIZATION");

    let garbage = app.get(&api("/users/@me"), Some("not-a-jwt")).await;
    garbage.expect_status(StatusCode::UNAUTHORIZED);

    // A refresh token is not an access token
    let session = app.register("writer").await;
    let wrong_kind = app
        .get(&api("/users/@me"), Some(&session.refresh_token))
        .await;
    wrong_kind.expect_status(StatusCode::UNAUTHORIZED);

    // Optional auth still rejects a bad token
    let listing = app.get(&api("/posts"), Some("not-a-jwt")).await;
    listing.expect_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_profile_update_and_public_view() {
    let app = TestApp::new();
    let session = app.register("writer").await;

    let updated = app
        .patch_json(
            &api("/users/@me"),
            Some(&session.access_token),
            &json!({"bio": "  Writes about Rust  "}),
        )
        .await;
    updated.expect_status(StatusCode::OK);
    assert_eq!(updated.value()["bio"], "Writes about Rust");

    let public = app
        .get(&api(&format!("/users/{}", session.user.id)), None)
        .await;
    public.expect_status(StatusCode::OK);
    let public: UserResponse = public.json();
    assert_eq!(public.bio.as_deref(), Some("Writes about Rust"));
    assert!(public.email.is_none());

    let unknown = app.get(&api("/users/424242"), None).await;
    unknown.expect_status(StatusCode::NOT_FOUND);

    let malformed = app.get(&api("/users/someone"), None).await;
    malformed.expect_status(StatusCode::BAD_REQUEST);
    assert_eq!(malformed.error_code(), "INVALID_PATH_PARAMETER");
}

// ============================================================================
// Posts
// ============================================================================

#[tokio::test]
async fn test_post_crud_by_author() {
    let app = TestApp::new();
    let author = app.register("writer").await;
    let post = app.create_post(&author.access_token, "  first post  ").await;
    assert_eq!(post.content, "first post");
    assert_eq!(post.author_id, author.user.id);
    assert!(!post.edited);

    let fetched = app.get(&api(&format!("/posts/{}", post.id)), None).await;
    fetched.expect_status(StatusCode::OK);
    let fetched: PostResponse = fetched.json();
    assert_eq!(fetched.id, post.id);
    assert!(fetched.me.is_none());

    let edited = app
        .patch_json(
            &api(&format!("/posts/{}", post.id)),
            Some(&author.access_token),
            &json!({"content": "edited post"}),
        )
        .await;
    edited.expect_status(StatusCode::OK);
    let edited: PostResponse = edited.json();
    assert_eq!(edited.content, "edited post");
    assert!(edited.edited);

    let deleted = app
        .delete(
            &api(&format!("/posts/{}", post.id)),
            Some(&author.access_token),
        )
        .await;
    deleted.expect_status(StatusCode::NO_CONTENT);

    let gone = app.get(&api(&format!("/posts/{}", post.id)), None).await;
    gone.expect_status(StatusCode::NOT_FOUND);
    assert_eq!(gone.error_code(), "UNKNOWN_POST");
}

#[tokio::test]
async fn test_only_author_can_modify_post() {
    let app = TestApp::new();
    let author = app.register("writer").await;
    let other = app.register("reader").await;
    let post = app.create_post(&author.access_token, "mine").await;
    let path = api(&format!("/posts/{}", post.id));

    let patch = app
        .patch_json(&path, Some(&other.access_token), &json!({"content": "yours"}))
        .await;
    patch.expect_status(StatusCode::FORBIDDEN);
    assert_eq!(patch.error_code(), "NOT_POST_AUTHOR");

    let delete = app.delete(&path, Some(&other.access_token)).await;
    delete.expect_status(StatusCode::FORBIDDEN);
    assert_eq!(delete.error_code(), "NOT_POST_AUTHOR");

    let unauthenticated = app.delete(&path, None).await;
    unauthenticated.expect_status(StatusCode::UNAUTHORIZED);

    let still_there: PostResponse = app.get(&path, None).await.json();
    assert_eq!(still_there.content, "mine");
}

#[tokio::test]
async fn test_post_validation_and_bad_ids() {
    let app = TestApp::new();
    let author = app.register("writer").await;

    let empty = app
        .post_json(
            &api("/posts"),
            Some(&author.access_token),
            &CreatePostRequest::text("   "),
        )
        .await;
    empty.expect_status(StatusCode::BAD_REQUEST);

    let too_long = app
        .post_json(
            &api("/posts"),
            Some(&author.access_token),
            &CreatePostRequest::text(&"x".repeat(10_001)),
        )
        .await;
    too_long.expect_status(StatusCode::BAD_REQUEST);
    assert_eq!(too_long.error_code(), "CONTENT_TOO_LONG");

    let too_long_form = app
        .send_multipart(
            Method::POST,
            &api("/posts"),
            Some(&author.access_token),
            MultipartForm::new().text("content", &"x".repeat(10_001)),
        )
        .await;
    too_long_form.expect_status(StatusCode::BAD_REQUEST);
    assert_eq!(too_long_form.error_code(), "CONTENT_TOO_LONG");

    let padded = app
        .post_json(
            &api("/posts"),
            Some(&author.access_token),
            &CreatePostRequest::text(&format!("  {}  ", "x".repeat(10_000))),
        )
        .await;
    padded.expect_status(StatusCode::CREATED);

    let bad_url = app
        .post_json(
            &api("/posts"),
            Some(&author.access_token),
            &json!({"content": "hi", "image_url": "ftp://example.com/a.png"}),
        )
        .await;
    bad_url.expect_status(StatusCode::BAD_REQUEST);

    let bad_id = app.get(&api("/posts/not-a-snowflake"), None).await;
    bad_id.expect_status(StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.error_code(), "INVALID_PATH_PARAMETER");

    let bad_cursor = app.get(&api("/posts?before=yesterday"), None).await;
    bad_cursor.expect_status(StatusCode::BAD_REQUEST);
    assert_eq!(bad_cursor.error_code(), "INVALID_QUERY_PARAMETER");
}

#[tokio::test]
async fn test_listing_is_newest_first_and_filterable() {
    let app = TestApp::new();
    let writer = app.register("writer").await;
    let reader = app.register("reader").await;

    let first = app.create_post(&writer.access_token, "one").await;
    let second = app.create_post(&reader.access_token, "two").await;
    let third = app.create_post(&writer.access_token, "three").await;

    let all: Vec<PostResponse> = app.get(&api("/posts"), None).await.json();
    let ids: Vec<&str> = all.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, [third.id.as_str(), second.id.as_str(), first.id.as_str()]);

    let page: Vec<PostResponse> = app
        .get(&api(&format!("/posts?limit=1&before={}", third.id)), None)
        .await
        .json();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, second.id);

    let window: Vec<PostResponse> = app
        .get(
            &api(&format!("/posts?before={}&after={}", third.id, first.id)),
            None,
        )
        .await
        .json();
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].id, second.id);

    let by_writer: Vec<PostResponse> = app
        .get(&api(&format!("/posts?author_id={}", writer.user.id)), None)
        .await
        .json();
    assert_eq!(by_writer.len(), 2);
    assert!(by_writer.iter().all(|p| p.author_id == writer.user.id));

    let user_posts = app
        .get(&api(&format!("/users/{}/posts", reader.user.id)), None)
        .await;
    user_posts.expect_status(StatusCode::OK);
    let user_posts: Vec<PostResponse> = user_posts.json();
    assert_eq!(user_posts.len(), 1);
    assert_eq!(user_posts[0].id, second.id);

    let unknown_author = app.get(&api("/users/424242/posts"), None).await;
    unknown_author.expect_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Images
// ============================================================================

#[tokio::test]
async fn test_multipart_upload_replace_and_remove() {
    let app = TestApp::new();
    let author = app.register("writer").await;

    let created = app
        .send_multipart(
            Method::POST,
            &api("/posts"),
            Some(&author.access_token),
            MultipartForm::new()
                .text("content", "with a picture")
                .file("image", "pixel.png", "image/png", TINY_PNG),
        )
        .await;
    created.expect_status(StatusCode::CREATED);
    let post: PostResponse = created.json();
    let first_url = post.image_url.clone().expect("image url");
    assert!(first_url.starts_with("memory://images/"));
    assert_eq!(app.backend.images.len(), 1);

    let path = api(&format!("/posts/{}", post.id));
    let replaced = app
        .send_multipart(
            Method::PATCH,
            &path,
            Some(&author.access_token),
            MultipartForm::new().file("image", "pixel2.png", "image/png", TINY_PNG),
        )
        .await;
    replaced.expect_status(StatusCode::OK);
    let replaced: PostResponse = replaced.json();
    assert_ne!(replaced.image_url.as_deref(), Some(first_url.as_str()));
    assert_eq!(replaced.content, "with a picture");
    assert_eq!(app.backend.images.len(), 1);

    let removed = app
        .send_multipart(
            Method::PATCH,
            &path,
            Some(&author.access_token),
            MultipartForm::new().text("remove_image", "true"),
        )
        .await;
    removed.expect_status(StatusCode::OK);
    let removed: PostResponse = removed.json();
    assert!(removed.image_url.is_none());
    assert!(app.backend.images.is_empty());
}

#[tokio::test]
async fn test_json_image_url_is_kept_as_is() {
    let app = TestApp::new();
    let author = app.register("writer").await;

    let created = app
        .post_json(
            &api("/posts"),
            Some(&author.access_token),
            &CreatePostRequest {
                content: "linked".to_string(),
                image_url: Some("https://img.example.com/cat.png".to_string()),
            },
        )
        .await;
    created.expect_status(StatusCode::CREATED);
    let post: PostResponse = created.json();
    assert_eq!(
        post.image_url.as_deref(),
        Some("https://img.example.com/cat.png")
    );
    assert!(app.backend.images.is_empty());
}

#[tokio::test]
async fn test_rejected_uploads() {
    let app = TestApp::new();
    let author = app.register("writer").await;

    let wrong_type = app
        .send_multipart(
            Method::POST,
            &api("/posts"),
            Some(&author.access_token),
            MultipartForm::new()
                .text("content", "not an image")
                .file("image", "notes.txt", "text/plain", b"hello"),
        )
        .await;
    wrong_type.expect_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);

    for (filename, content_type) in [
        ("evil.html", "image/x-evil"),
        ("logo.svg", "image/svg+xml"),
    ] {
        let markup = app
            .send_multipart(
                Method::POST,
                &api("/posts"),
                Some(&author.access_token),
                MultipartForm::new().text("content", "markup").file(
                    "image",
                    filename,
                    content_type,
                    b"<script>alert(1)</script>",
                ),
            )
            .await;
        markup.expect_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(markup.error_code(), "UNSUPPORTED_IMAGE_TYPE");
    }

    // The in-memory store accepts at most 1 KiB
    let too_big = app
        .send_multipart(
            Method::POST,
            &api("/posts"),
            Some(&author.access_token),
            MultipartForm::new()
                .text("content", "huge")
                .file("image", "big.png", "image/png", &vec![0u8; 4096]),
        )
        .await;
    too_big.expect_status(StatusCode::PAYLOAD_TOO_LARGE);

    assert!(app.backend.images.is_empty());
    assert!(app.backend.posts.is_empty());
}

#[tokio::test]
async fn test_local_uploads_are_served_without_sniffing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("pixel.png"), TINY_PNG).unwrap();

    let mut config = memory_config();
    config.storage.provider = StorageProvider::Local;
    config.storage.upload_dir = dir.path().to_string_lossy().into_owned();
    let app = TestApp::with_config(MemoryBackend::new(), config);

    let response = app.get("/uploads/pixel.png", None).await;
    response.expect_status(StatusCode::OK);
    assert_eq!(response.headers["content-type"], "image/png");
    assert_eq!(response.headers["x-content-type-options"], "nosniff");

    app.get("/uploads/missing.png", None)
        .await
        .expect_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Reactions
// ============================================================================

#[tokio::test]
async fn test_reaction_toggle_semantics() {
    let app = TestApp::new();
    let author = app.register("writer").await;
    let reader = app.register("reader").await;
    let post = app.create_post(&author.access_token, "react to me").await;
    let path = api(&format!("/posts/{}/reactions", post.id));

    let liked = app
        .post_json(&path, Some(&reader.access_token), &ToggleReactionRequest::like())
        .await;
    liked.expect_status(StatusCode::OK);
    let liked: ReactionToggleResponse = liked.json();
    assert!(liked.active);
    assert_eq!(liked.me.as_deref(), Some("like"));
    assert_eq!((liked.likes, liked.dislikes), (1, 0));

    // Same kind again removes it
    let unliked: ReactionToggleResponse = app
        .post_json(&path, Some(&reader.access_token), &ToggleReactionRequest::like())
        .await
        .json();
    assert!(!unliked.active);
    assert!(unliked.me.is_none());
    assert_eq!((unliked.likes, unliked.dislikes), (0, 0));

    // Like then dislike leaves only the dislike
    app.post_json(&path, Some(&reader.access_token), &ToggleReactionRequest::like())
        .await
        .expect_status(StatusCode::OK);
    let switched: ReactionToggleResponse = app
        .post_json(
            &path,
            Some(&reader.access_token),
            &ToggleReactionRequest::dislike(),
        )
        .await
        .json();
    assert_eq!(switched.me.as_deref(), Some("dislike"));
    assert_eq!((switched.likes, switched.dislikes), (0, 1));

    let summary = app.get(&path, Some(&reader.access_token)).await;
    summary.expect_status(StatusCode::OK);
    let summary = summary.value();
    assert_eq!(summary["me"], "dislike");
    assert_eq!(summary["disliked_by"][0], reader.user.id.as_str());

    let as_author: PostResponse = app
        .get(&api(&format!("/posts/{}", post.id)), Some(&author.access_token))
        .await
        .json();
    assert_eq!(as_author.dislikes, 1);
    assert!(as_author.me.is_none());
}

#[tokio::test]
async fn test_reaction_errors() {
    let app = TestApp::new();
    let reader = app.register("reader").await;
    let post = app.create_post(&reader.access_token, "post").await;

    let bad_kind = app
        .post_json(
            &api(&format!("/posts/{}/reactions", post.id)),
            Some(&reader.access_token),
            &json!({"type": "love"}),
        )
        .await;
    bad_kind.expect_status(StatusCode::BAD_REQUEST);
    assert_eq!(bad_kind.error_code(), "INVALID_REACTION_KIND");

    let unknown_post = app
        .post_json(
            &api("/posts/424242/reactions"),
            Some(&reader.access_token),
            &ToggleReactionRequest::like(),
        )
        .await;
    unknown_post.expect_status(StatusCode::NOT_FOUND);

    let bad_id = app
        .post_json(
            &api("/posts/abc/reactions"),
            Some(&reader.access_token),
            &ToggleReactionRequest::like(),
        )
        .await;
    bad_id.expect_status(StatusCode::BAD_REQUEST);

    let anonymous = app
        .post_json(
            &api(&format!("/posts/{}/reactions", post.id)),
            None,
            &ToggleReactionRequest::like(),
        )
        .await;
    anonymous.expect_status(StatusCode::UNAUTHORIZED);
}
