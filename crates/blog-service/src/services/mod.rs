//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of a
//! request.

pub mod auth;
pub mod context;
pub mod error;
pub mod health;
pub mod post;
pub mod reaction;
pub mod user;

pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use health::HealthService;
pub use post::PostService;
pub use reaction::ReactionService;
pub use user::UserService;
