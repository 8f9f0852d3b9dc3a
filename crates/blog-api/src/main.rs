//! Blog API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p blog-api
//! ```
//!
//! Configuration is read from the TOML file named by `BLOG_CONFIG`, or from
//! environment variables otherwise.

use blog_common::{try_init_tracing_with_config, AppConfig, ConfigError, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        storage = ?config.storage.provider,
        "Starting Blog API Server..."
    );

    if let Err(e) = blog_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

fn load_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();

    match std::env::var("BLOG_CONFIG") {
        Ok(path) => AppConfig::from_file(&path),
        Err(_) => AppConfig::from_env(),
    }
}
