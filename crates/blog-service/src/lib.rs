//! # blog-service
//!
//! Application layer containing business logic, services, and DTOs.
//! Services borrow a [`ServiceContext`] and only talk to the ports defined in
//! `blog-core`, so the same code runs against PostgreSQL/Redis or in-memory fakes.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod memory;

pub use dto::{
    AuthResponse, CreatePostRequest, CurrentUserResponse, HealthResponse, ImageInput,
    LoginRequest, LogoutRequest, PostInput, PostResponse, ReactionSummaryResponse,
    ReactionToggleResponse, ReadinessResponse, RefreshTokenRequest, RegisterRequest,
    ToggleReactionRequest, UpdatePostRequest, UpdateUserRequest, UserResponse,
};
pub use services::{
    AuthService, HealthService, PostService, ReactionService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, UserService,
};
