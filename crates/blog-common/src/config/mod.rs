//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    RateLimitConfig, RedisConfig, RemoteStorageConfig, ServerConfig, SnowflakeConfig,
    StorageConfig, StorageProvider,
};
