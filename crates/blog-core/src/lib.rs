//! # blog-core
//!
//! Domain layer containing entities, value objects and the ports (repository and
//! store traits) that infrastructure crates implement.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ImageUpload, Post, ReactionKind, ReactionSet, RefreshSession, StoredImage, ToggleOutcome, User,
};
pub use error::DomainError;
pub use traits::{
    HealthCheck, ImageStore, PostQuery, PostRepository, RepoResult, TokenStore, UserRepository,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
