//! Ports implemented by the infrastructure crates

mod repositories;
mod stores;

pub use repositories::{PostQuery, PostRepository, RepoResult, UserRepository};
pub use stores::{HealthCheck, ImageStore, TokenStore};
