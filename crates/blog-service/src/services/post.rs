//! Post service
//!
//! CRUD for posts and the images attached to them. Only the author may modify
//! or delete a post. Images we uploaded are removed from the image store when
//! they are replaced, cleared or their post is deleted; those removals are
//! best effort and only logged on failure.

use blog_core::entities::Post;
use blog_core::traits::PostQuery;
use blog_core::{DomainError, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{ImageInput, PostInput, PostResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Page through posts, newest first
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: PostQuery,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<Vec<PostResponse>> {
        let posts = self.ctx.post_repo().list(query).await?;
        Ok(posts
            .into_iter()
            .map(|post| PostResponse::for_viewer(post, viewer))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(
        &self,
        post_id: Snowflake,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<PostResponse> {
        let post = self.load(post_id).await?;
        Ok(PostResponse::for_viewer(post, viewer))
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        author_id: Snowflake,
        input: PostInput,
    ) -> ServiceResult<PostResponse> {
        let content = input
            .content
            .ok_or_else(|| ServiceError::validation("Content is required"))
            .and_then(normalize_content)?;

        let mut post = Post::new(self.ctx.generate_id(), author_id, content);
        let new_key = match input.image {
            Some(image) => self.attach(&mut post, image).await?,
            None => None,
        };

        if let Err(e) = self.ctx.post_repo().create(&post).await {
            self.discard_image(new_key.as_deref()).await;
            return Err(e.into());
        }

        info!(post_id = %post.id, has_image = post.has_image(), "Post created");
        Ok(PostResponse::for_viewer(post, Some(author_id)))
    }

    /// Partial update by the author
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        input: PostInput,
    ) -> ServiceResult<PostResponse> {
        let mut post = self.load_owned(post_id, user_id).await?;

        if let Some(content) = input.content {
            post.edit(normalize_content(content)?);
        }

        let mut new_key = None;
        let mut old_key = None;
        if let Some(image) = input.image {
            let previous = post.image_key.clone();
            new_key = self.attach(&mut post, image).await?;
            old_key = previous;
        } else if input.remove_image && post.has_image() {
            old_key = post.set_image(None, None);
        }

        if let Err(e) = self.ctx.post_repo().update(&post).await {
            self.discard_image(new_key.as_deref()).await;
            return Err(e.into());
        }
        self.discard_image(old_key.as_deref()).await;

        info!(post_id = %post.id, "Post updated");
        Ok(PostResponse::for_viewer(post, Some(user_id)))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, post_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        let post = self.load_owned(post_id, user_id).await?;

        self.ctx.post_repo().delete(post.id).await?;
        self.discard_image(post.image_key.as_deref()).await;

        info!(post_id = %post.id, "Post deleted");
        Ok(())
    }

    async fn load(&self, post_id: Snowflake) -> ServiceResult<Post> {
        self.ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::PostNotFound(post_id).into())
    }

    async fn load_owned(&self, post_id: Snowflake, user_id: Snowflake) -> ServiceResult<Post> {
        let post = self.load(post_id).await?;
        if !post.is_authored_by(user_id) {
            warn!(post_id = %post_id, user_id = %user_id, "Rejected edit by non-author");
            return Err(DomainError::NotPostAuthor.into());
        }
        Ok(post)
    }

    /// Set the post image, returning the key of a freshly stored upload
    async fn attach(&self, post: &mut Post, image: ImageInput) -> ServiceResult<Option<String>> {
        match image {
            ImageInput::Upload(upload) => {
                let stored = self.ctx.image_store().put(upload).await?;
                post.set_image(Some(stored.url), Some(stored.key.clone()));
                Ok(Some(stored.key))
            }
            ImageInput::Url(url) => {
                let url = url.trim();
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return Err(DomainError::ValidationError(
                        "Image URL must use http or https".to_string(),
                    )
                    .into());
                }
                post.set_image(Some(url.to_string()), None);
                Ok(None)
            }
        }
    }

    async fn discard_image(&self, key: Option<&str>) {
        let Some(key) = key else { return };
        if let Err(e) = self.ctx.image_store().delete(key).await {
            warn!(key, error = %e, "Failed to delete stored image");
        }
    }
}

fn normalize_content(content: String) -> ServiceResult<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation("Content cannot be empty"));
    }
    if trimmed.chars().count() > Post::MAX_CONTENT_LENGTH {
        return Err(DomainError::ContentTooLong {
            max: Post::MAX_CONTENT_LENGTH,
        }
        .into());
    }
    Ok(trimmed.to_string())
}
