//! Test fixtures and data generators

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Short random suffix, unique across runs against the same database
pub fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..10].to_string()
}

/// Smallest valid PNG: a 1x1 transparent pixel
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("writer_{suffix}"),
            email: format!("writer_{suffix}@example.com"),
            password: "TestPass123!".to_string(),
        }
    }

    pub fn named(username: &str) -> Self {
        Self {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "TestPass123!".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CreatePostRequest {
    pub fn text(content: &str) -> Self {
        Self {
            content: content.to_string(),
            image_url: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub content: String,
    pub image_url: Option<String>,
    pub likes: usize,
    pub dislikes: usize,
    pub me: Option<String>,
    pub edited: bool,
}

#[derive(Debug, Serialize)]
pub struct ToggleReactionRequest {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ToggleReactionRequest {
    pub fn like() -> Self {
        Self {
            kind: "like".to_string(),
        }
    }

    pub fn dislike() -> Self {
        Self {
            kind: "dislike".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReactionToggleResponse {
    pub active: bool,
    pub me: Option<String>,
    pub likes: usize,
    pub dislikes: usize,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
