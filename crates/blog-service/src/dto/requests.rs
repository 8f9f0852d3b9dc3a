//! Request DTOs for API endpoints
//!
//! JSON bodies implement `Deserialize` and `Validate`. [`PostInput`] is the
//! body-format-neutral form the post service works with; the API builds it
//! from either JSON or multipart requests.

use blog_core::entities::ImageUpload;
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Without a token every session of the user is revoked
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

// ============================================================================
// User Requests
// ============================================================================

/// Profile update. An empty `bio` or `avatar` clears the field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: Option<String>,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,

    #[validate(length(max = 2048, message = "Avatar URL is too long"))]
    pub avatar: Option<String>,
}

// ============================================================================
// Post Requests
// ============================================================================

/// JSON body of `POST /posts`. Content length is checked after trimming by
/// the post service, for JSON and multipart bodies alike.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    pub content: String,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,
}

/// JSON body of `PATCH /posts/{id}`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePostRequest {
    pub content: Option<String>,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,

    #[serde(default)]
    pub remove_image: bool,
}

/// Where a post image comes from
#[derive(Debug, Clone)]
pub enum ImageInput {
    /// Bytes to hand to the image store
    Upload(ImageUpload),
    /// Already hosted elsewhere; stored as-is
    Url(String),
}

/// Post fields after the body format has been decoded
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub content: Option<String>,
    pub image: Option<ImageInput>,
    pub remove_image: bool,
}

impl From<CreatePostRequest> for PostInput {
    fn from(request: CreatePostRequest) -> Self {
        Self {
            content: Some(request.content),
            image: request.image_url.map(ImageInput::Url),
            remove_image: false,
        }
    }
}

impl From<UpdatePostRequest> for PostInput {
    fn from(request: UpdatePostRequest) -> Self {
        Self {
            content: request.content,
            image: request.image_url.map(ImageInput::Url),
            remove_image: request.remove_image,
        }
    }
}

// ============================================================================
// Reaction Requests
// ============================================================================

/// `{"type": "like" | "dislike"}`
///
/// The kind stays a string here so an unknown value is reported as
/// `INVALID_REACTION_KIND` instead of a generic body error.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ToggleReactionRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Reaction type is required"))]
    pub kind: String,
}
