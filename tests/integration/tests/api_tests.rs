//! API tests against a live server
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET, API_PORT
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, AuthResponse, CreatePostRequest, ErrorResponse,
    LoginRequest, PostResponse, ReactionToggleResponse, RegisterRequest, TestServer,
    ToggleReactionRequest, TINY_PNG,
};
use reqwest::{multipart, StatusCode};
use serde_json::json;

async fn register(server: &TestServer) -> (RegisterRequest, AuthResponse) {
    let request = RegisterRequest::unique();
    let response = server.post("/auth/register", &request).await.unwrap();
    let auth = assert_json(response, StatusCode::CREATED).await.unwrap();
    (request, auth)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/health/ready").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_register_login_refresh() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, registered) = register(&server).await;
    assert_eq!(registered.user.username, request.username);

    let duplicate = server.post("/auth/register", &request).await.unwrap();
    assert_status(duplicate, StatusCode::CONFLICT).await.unwrap();

    let login = server
        .post("/auth/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let login: AuthResponse = assert_json(login, StatusCode::OK).await.unwrap();

    let refresh_body = json!({"refresh_token": login.refresh_token});
    let rotated = server.post("/auth/refresh", &refresh_body).await.unwrap();
    let rotated: AuthResponse = assert_json(rotated, StatusCode::OK).await.unwrap();
    assert_ne!(rotated.refresh_token, login.refresh_token);

    let replayed = server.post("/auth/refresh", &refresh_body).await.unwrap();
    assert_status(replayed, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
}

// ============================================================================
// Posts and reactions
// ============================================================================

#[tokio::test]
async fn test_post_lifecycle_with_reactions() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, author) = register(&server).await;
    let (_, reader) = register(&server).await;

    let created = server
        .post_auth(
            "/posts",
            &author.access_token,
            &CreatePostRequest::text("hello from the live server"),
        )
        .await
        .unwrap();
    let post: PostResponse = assert_json(created, StatusCode::CREATED).await.unwrap();

    let reactions = format!("/posts/{}/reactions", post.id);
    let liked = server
        .post_auth(&reactions, &reader.access_token, &ToggleReactionRequest::like())
        .await
        .unwrap();
    let liked: ReactionToggleResponse = assert_json(liked, StatusCode::OK).await.unwrap();
    assert!(liked.active);
    assert_eq!(liked.likes, 1);

    let disliked = server
        .post_auth(
            &reactions,
            &reader.access_token,
            &ToggleReactionRequest::dislike(),
        )
        .await
        .unwrap();
    let disliked: ReactionToggleResponse =
        assert_json(disliked, StatusCode::OK).await.unwrap();
    assert_eq!((disliked.likes, disliked.dislikes), (0, 1));

    let forbidden = server
        .delete_auth(&format!("/posts/{}", post.id), &reader.access_token)
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(forbidden, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(error.error.code, "NOT_POST_AUTHOR");

    let deleted = server
        .delete_auth(&format!("/posts/{}", post.id), &author.access_token)
        .await
        .unwrap();
    assert_status(deleted, StatusCode::NO_CONTENT).await.unwrap();
}

#[tokio::test]
async fn test_multipart_upload_is_served() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, author) = register(&server).await;

    let image = multipart::Part::bytes(TINY_PNG.to_vec())
        .file_name("pixel.png")
        .mime_str("image/png")
        .unwrap();
    let form = multipart::Form::new()
        .text("content", "picture post")
        .part("image", image);

    let created = server
        .post_multipart("/posts", &author.access_token, form)
        .await
        .unwrap();
    let post: PostResponse = assert_json(created, StatusCode::CREATED).await.unwrap();
    let image_url = post.image_url.expect("image url");

    // Only locally stored images are served by this process
    if let Some(path) = image_url
        .find("/uploads/")
        .map(|start| image_url[start..].to_string())
    {
        let served = server.get(&path).await.unwrap();
        assert_status(served, StatusCode::OK).await.unwrap();
    }

    let deleted = server
        .delete_auth(&format!("/posts/{}", post.id), &author.access_token)
        .await
        .unwrap();
    assert_status(deleted, StatusCode::NO_CONTENT).await.unwrap();
}
