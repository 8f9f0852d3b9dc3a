//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, pagination and post
//! bodies.

mod auth;
mod pagination;
mod path;
mod post_form;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use pagination::{Pagination, PaginationParams, PostFilter};
pub use path::{PostIdPath, UserIdPath};
pub use post_form::PostForm;
pub use validated::ValidatedJson;
