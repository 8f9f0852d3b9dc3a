//! # blog-cache
//!
//! Redis layer backing refresh-token sessions.
//!
//! ```ignore
//! use blog_cache::{RedisPool, RedisTokenStore};
//!
//! let pool = RedisPool::from_config(&config.redis)?;
//! let sessions = RedisTokenStore::new(pool.clone());
//! ```

pub mod pool;
pub mod session;

pub use pool::{RedisHealthCheck, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use session::RedisTokenStore;
