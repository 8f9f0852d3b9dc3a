//! In-memory implementations of the `blog-core` ports
//!
//! They follow the same contracts as the PostgreSQL, Redis and storage
//! implementations (case-insensitive uniqueness, cursor pagination, exclusive
//! reactions) so services and routers can be exercised without external
//! services. Enabled for unit tests and through the `testing` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use blog_core::entities::{
    ImageUpload, Post, ReactionKind, ReactionSet, RefreshSession, StoredImage, User,
};
use blog_core::traits::{
    HealthCheck, ImageStore, PostQuery, PostRepository, RepoResult, TokenStore, UserRepository,
};
use blog_common::JwtService;
use blog_core::{DomainError, Snowflake, SnowflakeGenerator};

use crate::services::{ServiceContext, ServiceResult};

/// Signing secret used by [`MemoryBackend::context`]
pub const TEST_JWT_SECRET: &str = "memory-backend-secret-key-0123456789";

/// One of each in-memory store, shared with the contexts built from it
pub struct MemoryBackend {
    pub users: Arc<MemoryUserRepository>,
    pub posts: Arc<MemoryPostRepository>,
    pub tokens: Arc<MemoryTokenStore>,
    pub images: Arc<MemoryImageStore>,
    pub database: Arc<StaticHealthCheck>,
    pub cache: Arc<StaticHealthCheck>,
}

impl MemoryBackend {
    /// Stores with a 1 KiB image limit
    pub fn new() -> Self {
        Self::with_max_image_size(1024)
    }

    pub fn with_max_image_size(max_size: usize) -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new()),
            posts: Arc::new(MemoryPostRepository::new()),
            tokens: Arc::new(MemoryTokenStore::new()),
            images: Arc::new(MemoryImageStore::new(max_size)),
            database: Arc::new(StaticHealthCheck::new("database", true)),
            cache: Arc::new(StaticHealthCheck::new("redis", true)),
        }
    }

    /// Service context over these stores, signing tokens with [`TEST_JWT_SECRET`]
    ///
    /// # Errors
    /// Never fails in practice; mirrors [`ServiceContextBuilder::build`](crate::ServiceContextBuilder::build)
    pub fn context(&self) -> ServiceResult<ServiceContext> {
        ServiceContext::builder()
            .user_repo(self.users.clone())
            .post_repo(self.posts.clone())
            .token_store(self.tokens.clone())
            .image_store(self.images.clone())
            .health_check(self.database.clone())
            .health_check(self.cache.clone())
            .jwt_service(Arc::new(JwtService::new(TEST_JWT_SECRET, 900, 3600)))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .build()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Snowflake, (User, String)>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn conflict(
        users: &HashMap<Snowflake, (User, String)>,
        candidate: &User,
    ) -> Option<DomainError> {
        users
            .values()
            .filter(|(user, _)| user.id != candidate.id)
            .find_map(|(user, _)| {
                if user.email.eq_ignore_ascii_case(&candidate.email) {
                    Some(DomainError::EmailAlreadyExists)
                } else if user.username.eq_ignore_ascii_case(&candidate.username) {
                    Some(DomainError::UsernameAlreadyExists)
                } else {
                    None
                }
            })
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.users.read().get(&id).map(|(user, _)| user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|(user, _)| user.email.eq_ignore_ascii_case(email))
            .map(|(user, _)| user.clone()))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|(user, _)| user.username.eq_ignore_ascii_case(username))
            .map(|(user, _)| user.clone()))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut users = self.users.write();
        if let Some(err) = Self::conflict(&users, user) {
            return Err(err);
        }
        users.insert(user.id, (user.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut users = self.users.write();
        if let Some(err) = Self::conflict(&users, user) {
            return Err(err);
        }
        let (stored, _) = users
            .get_mut(&user.id)
            .ok_or(DomainError::UserNotFound(user.id))?;
        *stored = user.clone();
        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self.users.read().get(&id).map(|(_, hash)| hash.clone()))
    }
}

// ============================================================================
// Posts
// ============================================================================

#[derive(Default)]
pub struct MemoryPostRepository {
    posts: RwLock<HashMap<Snowflake, Post>>,
}

impl MemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.posts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        Ok(self.posts.read().get(&id).cloned())
    }

    async fn list(&self, query: PostQuery) -> RepoResult<Vec<Post>> {
        let limit = usize::try_from(query.limit.clamp(1, 100)).unwrap_or(100);
        let posts = self.posts.read();
        let mut matching: Vec<&Post> = posts
            .values()
            .filter(|post| query.author_id.map_or(true, |author| post.author_id == author))
            .collect();

        let page: Vec<Post> = match (query.before, query.after) {
            (None, Some(after)) => {
                matching.retain(|post| post.id > after);
                matching.sort_by_key(|post| post.id);
                let mut page: Vec<Post> = matching.into_iter().take(limit).cloned().collect();
                page.reverse();
                page
            }
            (before, after) => {
                matching.retain(|post| {
                    before.map_or(true, |before| post.id < before)
                        && after.map_or(true, |after| post.id > after)
                });
                matching.sort_by_key(|post| std::cmp::Reverse(post.id));
                matching.into_iter().take(limit).cloned().collect()
            }
        };

        Ok(page)
    }

    async fn create(&self, post: &Post) -> RepoResult<()> {
        self.posts.write().insert(post.id, post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> RepoResult<()> {
        let mut posts = self.posts.write();
        let stored = posts
            .get_mut(&post.id)
            .ok_or(DomainError::PostNotFound(post.id))?;
        stored.content.clone_from(&post.content);
        stored.image_url.clone_from(&post.image_url);
        stored.image_key.clone_from(&post.image_key);
        stored.updated_at = post.updated_at;
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        self.posts
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::PostNotFound(id))
    }

    async fn toggle_reaction(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<ReactionSet> {
        let mut posts = self.posts.write();
        let post = posts
            .get_mut(&post_id)
            .ok_or(DomainError::PostNotFound(post_id))?;
        post.reactions.toggle(user_id, kind);
        Ok(post.reactions.clone())
    }
}

// ============================================================================
// Refresh sessions
// ============================================================================

/// Session store without expiry
#[derive(Default)]
pub struct MemoryTokenStore {
    sessions: Mutex<HashMap<String, RefreshSession>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn store(
        &self,
        token_id: &str,
        session: &RefreshSession,
        _ttl_seconds: u64,
    ) -> RepoResult<()> {
        self.sessions
            .lock()
            .insert(token_id.to_string(), session.clone());
        Ok(())
    }

    async fn get(&self, token_id: &str) -> RepoResult<Option<RefreshSession>> {
        Ok(self.sessions.lock().get(token_id).cloned())
    }

    async fn revoke(&self, token_id: &str) -> RepoResult<bool> {
        Ok(self.sessions.lock().remove(token_id).is_some())
    }

    async fn revoke_all_for_user(&self, user_id: Snowflake) -> RepoResult<u32> {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, session| session.user_id != user_id);
        Ok(u32::try_from(before - sessions.len()).unwrap_or(u32::MAX))
    }
}

// ============================================================================
// Images
// ============================================================================

/// Keeps image bytes in a map; URLs use the `memory://` scheme
pub struct MemoryImageStore {
    max_size: usize,
    images: Mutex<HashMap<String, Vec<u8>>>,
    next_key: AtomicU64,
    fail_deletes: AtomicBool,
}

impl MemoryImageStore {
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            images: Mutex::new(HashMap::new()),
            next_key: AtomicU64::new(1),
            fail_deletes: AtomicBool::new(false),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.images.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.images.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every following `delete` fail with a storage error
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    fn max_size(&self) -> usize {
        self.max_size
    }

    async fn put(&self, upload: ImageUpload) -> RepoResult<StoredImage> {
        let (content_type, extension) = upload.validate(self.max_size)?;

        let n = self.next_key.fetch_add(1, Ordering::SeqCst);
        let key = format!("img-{n}.{extension}");
        let stored = StoredImage {
            url: format!("memory://images/{key}"),
            key: key.clone(),
            content_type: content_type.to_string(),
            size: upload.bytes.len(),
        };
        self.images.lock().insert(key, upload.bytes);
        Ok(stored)
    }

    async fn delete(&self, key: &str) -> RepoResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(DomainError::StorageError("delete failed".to_string()));
        }
        self.images.lock().remove(key);
        Ok(())
    }
}

// ============================================================================
// Health
// ============================================================================

/// Probe whose outcome is set by the test
pub struct StaticHealthCheck {
    name: &'static str,
    healthy: AtomicBool,
}

impl StaticHealthCheck {
    pub fn new(name: &'static str, healthy: bool) -> Self {
        Self {
            name,
            healthy: AtomicBool::new(healthy),
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl HealthCheck for StaticHealthCheck {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn check(&self) -> RepoResult<()> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::InternalError(format!("{} is down", self.name)))
        }
    }
}
