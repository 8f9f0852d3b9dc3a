//! User profile service

use blog_core::entities::User;
use blog_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{CurrentUserResponse, UpdateUserRequest, UserResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn get_current(&self, user_id: Snowflake) -> ServiceResult<CurrentUserResponse> {
        let user = self.load(user_id).await?;
        Ok(CurrentUserResponse::from(&user))
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Snowflake) -> ServiceResult<UserResponse> {
        let user = self.load(user_id).await?;
        Ok(UserResponse::from(&user))
    }

    /// Apply a partial profile update
    #[instrument(skip(self, request))]
    pub async fn update_current(
        &self,
        user_id: Snowflake,
        request: UpdateUserRequest,
    ) -> ServiceResult<CurrentUserResponse> {
        let mut user = self.load(user_id).await?;

        if let Some(username) = request.username {
            let username = username.trim().to_string();
            if !User::is_valid_username(&username) {
                return Err(DomainError::InvalidUsername(username).into());
            }
            if !username.eq_ignore_ascii_case(&user.username)
                && self.ctx.user_repo().username_exists(&username).await?
            {
                return Err(DomainError::UsernameAlreadyExists.into());
            }
            user.set_username(username);
        }

        if let Some(bio) = request.bio {
            let bio = non_empty(bio);
            if bio.as_ref().is_some_and(|b| b.chars().count() > User::BIO_MAX) {
                return Err(DomainError::ValidationError(format!(
                    "Bio must be at most {} characters",
                    User::BIO_MAX
                ))
                .into());
            }
            user.set_bio(bio);
        }

        if let Some(avatar) = request.avatar {
            user.set_avatar(non_empty(avatar));
        }

        self.ctx.user_repo().update(&user).await?;
        info!(user_id = %user.id, "Profile updated");

        Ok(CurrentUserResponse::from(&user))
    }

    async fn load(&self, user_id: Snowflake) -> ServiceResult<User> {
        Ok(self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?)
    }
}

/// Trim, mapping an empty string to `None`
fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use blog_core::traits::UserRepository;

    async fn seed(backend: &MemoryBackend, id: i64, username: &str) -> User {
        let user = User::new(
            Snowflake::new(id),
            username.to_string(),
            format!("{username}@example.com"),
        );
        backend.users.create(&user, "hash").await.unwrap();
        user
    }

    #[tokio::test]
    async fn test_get_current_and_public_profile() {
        let backend = MemoryBackend::new();
        let ctx = backend.context().unwrap();
        let user = seed(&backend, 1, "writer").await;
        let service = UserService::new(&ctx);

        let me = service.get_current(user.id).await.unwrap();
        assert_eq!(me.email, "writer@example.com");

        let public = service.get_user(user.id).await.unwrap();
        assert_eq!(public.username, "writer");

        let err = service.get_user(Snowflake::new(99)).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let backend = MemoryBackend::new();
        let ctx = backend.context().unwrap();
        let user = seed(&backend, 1, "writer").await;
        let service = UserService::new(&ctx);

        let updated = service
            .update_current(
                user.id,
                UpdateUserRequest {
                    username: Some("Writer".to_string()),
                    bio: Some("  hello  ".to_string()),
                    avatar: Some("https://img.example.com/me.png".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.username, "Writer");
        assert_eq!(updated.bio.as_deref(), Some("hello"));

        let cleared = service
            .update_current(
                user.id,
                UpdateUserRequest {
                    bio: Some(String::new()),
                    ..UpdateUserRequest::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.bio.is_none());
        assert!(cleared.avatar.is_some());
    }

    #[tokio::test]
    async fn test_update_rejects_taken_or_invalid_username() {
        let backend = MemoryBackend::new();
        let ctx = backend.context().unwrap();
        let user = seed(&backend, 1, "writer").await;
        seed(&backend, 2, "reader").await;
        let service = UserService::new(&ctx);

        let taken = UpdateUserRequest {
            username: Some("READER".to_string()),
            ..UpdateUserRequest::default()
        };
        let err = service.update_current(user.id, taken).await.unwrap_err();
        assert_eq!(err.error_code(), "USERNAME_ALREADY_EXISTS");

        let invalid = UpdateUserRequest {
            username: Some("no spaces".to_string()),
            ..UpdateUserRequest::default()
        };
        let err = service.update_current(user.id, invalid).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
