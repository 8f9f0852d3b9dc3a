//! PostgreSQL implementations of the repository traits defined in blog-core.

mod error;
mod health;
mod post;
mod user;

pub use health::PgHealthCheck;
pub use post::PgPostRepository;
pub use user::PgUserRepository;
