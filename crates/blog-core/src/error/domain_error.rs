//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Post not found: {0}")]
    PostNotFound(Snowflake),

    #[error("Session not found")]
    SessionNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Invalid reaction type '{0}', expected 'like' or 'dislike'")]
    InvalidReactionKind(String),

    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(String),

    #[error("Image too large: max {max_bytes} bytes")]
    ImageTooLarge { max_bytes: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not post author")]
    NotPostAuthor,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Username already taken")]
    UsernameAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::SessionNotFound => "UNKNOWN_SESSION",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::InvalidReactionKind(_) => "INVALID_REACTION_KIND",
            Self::UnsupportedImageType(_) => "UNSUPPORTED_IMAGE_TYPE",
            Self::ImageTooLarge { .. } => "IMAGE_TOO_LARGE",

            // Authorization
            Self::NotPostAuthor => "NOT_POST_AUTHOR",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::UsernameAlreadyExists => "USERNAME_ALREADY_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::PostNotFound(_) | Self::SessionNotFound
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidUsername(_)
                | Self::WeakPassword(_)
                | Self::ContentTooLong { .. }
                | Self::InvalidReactionKind(_)
                | Self::UnsupportedImageType(_)
                | Self::ImageTooLarge { .. }
        )
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotPostAuthor)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists | Self::UsernameAlreadyExists)
    }
}
