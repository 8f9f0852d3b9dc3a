//! In-process router harness
//!
//! Builds the real application router over [`MemoryBackend`] and drives it
//! with `tower::ServiceExt::oneshot`, so every extractor, middleware layer and
//! error mapping runs without PostgreSQL or Redis.

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use blog_api::{create_app, routes::API_PREFIX, AppState};
use blog_common::{
    AppConfig, AppSettings, CorsConfig, DatabaseConfig, JwtConfig, RateLimitConfig, RedisConfig,
    ServerConfig, SnowflakeConfig, StorageConfig, StorageProvider,
};
use blog_service::memory::{MemoryBackend, TEST_JWT_SECRET};
use serde::{de::DeserializeOwned, Serialize};
use tower::ServiceExt;

use crate::fixtures::{AuthResponse, CreatePostRequest, PostResponse, RegisterRequest};

const MULTIPART_BOUNDARY: &str = "integration-test-boundary";

/// Prefix `path` with the API version
pub fn api(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

/// Configuration matching the in-memory backend; nothing here is dialed
pub fn memory_config() -> AppConfig {
    AppConfig {
        app: AppSettings::default(),
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            run_migrations: false,
            migrations_dir: "migrations".to_string(),
        },
        redis: RedisConfig {
            url: "redis://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 3600,
        },
        rate_limit: RateLimitConfig {
            requests_per_second: 1000,
            burst: 1000,
        },
        cors: CorsConfig::default(),
        storage: StorageConfig {
            provider: StorageProvider::Remote,
            max_file_size_mb: 1,
            ..StorageConfig::default()
        },
        snowflake: SnowflakeConfig::default(),
    }
}

/// Application router over in-memory stores
pub struct TestApp {
    router: Router,
    pub backend: MemoryBackend,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_backend(MemoryBackend::new())
    }

    pub fn with_backend(backend: MemoryBackend) -> Self {
        Self::with_config(backend, memory_config())
    }

    pub fn with_config(backend: MemoryBackend, config: AppConfig) -> Self {
        let context = backend.context().expect("memory context");
        let state = AppState::new(context, config);
        let router = create_app(state).expect("router");
        Self { router, backend }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(build(Method::GET, path, token, None, Body::empty()))
            .await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(build(Method::DELETE, path, token, None, Body::empty()))
            .await
    }

    pub async fn post_json<T: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        self.send(json_request(Method::POST, path, token, body)).await
    }

    pub async fn patch_json<T: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        self.send(json_request(Method::PATCH, path, token, body))
            .await
    }

    pub async fn send_multipart(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        form: MultipartForm,
    ) -> TestResponse {
        let content_type = format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}");
        self.send(build(
            method,
            path,
            token,
            Some(&content_type),
            Body::from(form.finish()),
        ))
        .await
    }

    /// Register `username` and return the session
    pub async fn register(&self, username: &str) -> AuthResponse {
        let response = self
            .post_json(&api("/auth/register"), None, &RegisterRequest::named(username))
            .await;
        response.expect_status(StatusCode::CREATED);
        response.json()
    }

    /// Create a text post as the owner of `token`
    pub async fn create_post(&self, token: &str, content: &str) -> PostResponse {
        let response = self
            .post_json(
                &api("/posts"),
                Some(token),
                &CreatePostRequest::text(content),
            )
            .await;
        response.expect_status(StatusCode::CREATED);
        response.json()
    }
}

fn build(
    method: Method,
    path: &str,
    token: Option<&str>,
    content_type: Option<&str>,
    body: Body,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(body).expect("request")
}

fn json_request<T: Serialize>(
    method: Method,
    path: &str,
    token: Option<&str>,
    body: &T,
) -> Request<Body> {
    let body = serde_json::to_vec(body).expect("serializable body");
    build(
        method,
        path,
        token,
        Some("application/json"),
        Body::from(body),
    )
}

/// Collected router response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Panic with the body if the status differs
    pub fn expect_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "unexpected status, body: {}",
            String::from_utf8_lossy(&self.body)
        );
    }

    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "invalid JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn value(&self) -> serde_json::Value {
        self.json()
    }

    /// `error.code` of an error body
    pub fn error_code(&self) -> String {
        self.value()["error"]["code"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }
}

/// Hand-built `multipart/form-data` body
#[derive(Debug, Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}
