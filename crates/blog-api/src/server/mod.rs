//! Server setup and initialization
//!
//! Provides the application builder and the server runner.

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::Router;
use blog_cache::{RedisHealthCheck, RedisPool, RedisTokenStore};
use blog_common::{AppConfig, AppError, JwtService, StorageProvider};
use blog_core::SnowflakeGenerator;
use blog_db::{create_pool, run_migrations, PgHealthCheck, PgPostRepository, PgUserRepository};
use blog_service::ServiceContext;
use blog_storage::{create_image_store, UPLOADS_ROUTE};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeader;
use tracing::info;

use crate::middleware::{apply_middleware, MiddlewareConfig};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();

    let api = apply_middleware(
        create_router(),
        MiddlewareConfig {
            rate_limit: &config.rate_limit,
            cors: &config.cors,
            is_production: config.app.env.is_production(),
            max_upload_bytes: config.storage.max_file_size_bytes(),
        },
    )?;

    let mut router = api.merge(health_routes());

    if config.storage.provider == StorageProvider::Local {
        router = router.nest_service(UPLOADS_ROUTE, uploads_service(&config.storage.upload_dir));
    }

    Ok(router.with_state(state))
}

/// Static files for locally stored images; browsers must not sniff them into
/// another content type
fn uploads_service(upload_dir: &str) -> SetResponseHeader<ServeDir, HeaderValue> {
    SetResponseHeader::overriding(
        ServeDir::new(upload_dir),
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    )
}

/// Connect to every backend and assemble the service context
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&blog_db::DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, &config.database.migrations_dir)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
        info!(dir = %config.database.migrations_dir, "Migrations applied");
    }

    info!("Connecting to Redis...");
    let redis_pool =
        RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis pool created");

    let image_store = create_image_store(&config.storage)?;
    info!(provider = ?config.storage.provider, "Image store ready");

    let service_context = ServiceContext::builder()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .post_repo(Arc::new(PgPostRepository::new(pool.clone())))
        .token_store(Arc::new(RedisTokenStore::new(redis_pool.clone())))
        .image_store(image_store)
        .health_check(Arc::new(PgHealthCheck::new(pool)))
        .health_check(Arc::new(RedisHealthCheck::new(redis_pool)))
        .jwt_service(Arc::new(JwtService::from_config(&config.jwt)))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Serve `app` on `addr` until Ctrl+C or SIGTERM
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    run_server(app, &addr).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
