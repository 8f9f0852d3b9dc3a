//! # blog-db
//!
//! Database layer implementing the `blog-core` repository traits with PostgreSQL via SQLx.
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Model to entity mappers
//! - Repository implementations
//!
//! ```rust,ignore
//! use blog_db::{create_pool, run_migrations, DatabaseConfig, PgPostRepository};
//!
//! let pool = create_pool(&DatabaseConfig::from(&app_config.database)).await?;
//! run_migrations(&pool, "./migrations").await?;
//! let posts = PgPostRepository::new(pool);
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgHealthCheck, PgPostRepository, PgUserRepository};
