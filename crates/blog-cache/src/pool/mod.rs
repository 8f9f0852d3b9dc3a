//! Redis connection pool

mod redis_pool;

pub use redis_pool::{RedisHealthCheck, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
