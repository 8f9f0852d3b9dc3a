//! Data transfer objects for API requests and responses

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreatePostRequest, ImageInput, LoginRequest, LogoutRequest, PostInput, RefreshTokenRequest,
    RegisterRequest, ToggleReactionRequest, UpdatePostRequest, UpdateUserRequest,
};
pub use responses::{
    AuthResponse, CurrentUserResponse, HealthResponse, PostResponse, ReactionSummaryResponse,
    ReactionToggleResponse, ReadinessResponse, UserResponse,
};
