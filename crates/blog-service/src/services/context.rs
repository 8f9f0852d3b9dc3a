//! Service context - dependency container for services

use std::sync::Arc;

use blog_common::{JwtService, PasswordService};
use blog_core::traits::{HealthCheck, ImageStore, PostRepository, TokenStore, UserRepository};
use blog_core::{Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};

/// Everything a service needs, behind trait objects
///
/// Cloning is cheap; all members are reference counted.
#[derive(Clone)]
pub struct ServiceContext {
    user_repo: Arc<dyn UserRepository>,
    post_repo: Arc<dyn PostRepository>,
    token_store: Arc<dyn TokenStore>,
    image_store: Arc<dyn ImageStore>,
    health_checks: Vec<Arc<dyn HealthCheck>>,
    jwt_service: Arc<JwtService>,
    password_service: PasswordService,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn token_store(&self) -> &dyn TokenStore {
        self.token_store.as_ref()
    }

    pub fn image_store(&self) -> &dyn ImageStore {
        self.image_store.as_ref()
    }

    pub fn health_checks(&self) -> &[Arc<dyn HealthCheck>] {
        &self.health_checks
    }

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field(
                "health_checks",
                &self.health_checks.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("worker_id", &self.snowflake_generator.worker_id())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    token_store: Option<Arc<dyn TokenStore>>,
    image_store: Option<Arc<dyn ImageStore>>,
    health_checks: Vec<Arc<dyn HealthCheck>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn image_store(mut self, store: Arc<dyn ImageStore>) -> Self {
        self.image_store = Some(store);
        self
    }

    /// Register a readiness probe; may be called repeatedly
    pub fn health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// # Errors
    /// Returns `ServiceError::Internal` naming the first missing dependency
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::internal(format!("{name} is required")))
        }

        Ok(ServiceContext {
            user_repo: required(self.user_repo, "user_repo")?,
            post_repo: required(self.post_repo, "post_repo")?,
            token_store: required(self.token_store, "token_store")?,
            image_store: required(self.image_store, "image_store")?,
            health_checks: self.health_checks,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            password_service: PasswordService::new(),
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
        })
    }
}
