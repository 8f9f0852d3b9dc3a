//! Entity to DTO mappers

use blog_common::TokenPair;
use blog_core::entities::{Post, ReactionSet, User};
use blog_core::Snowflake;

use super::responses::{
    AuthResponse, CurrentUserResponse, PostResponse, ReactionSummaryResponse, UserResponse,
};

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            avatar: user.avatar.clone(),
            bio: user.bio.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            bio: user.bio.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl AuthResponse {
    pub fn new(tokens: TokenPair, user: &User) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            user: CurrentUserResponse::from(user),
        }
    }
}

impl PostResponse {
    /// Render a post as seen by `viewer`
    pub fn for_viewer(post: Post, viewer: Option<Snowflake>) -> Self {
        let me = viewer.and_then(|id| post.reactions.state_of(id));
        let edited = post.is_edited();
        let ReactionSet {
            liked_by,
            disliked_by,
        } = post.reactions;

        Self {
            id: post.id,
            author_id: post.author_id,
            content: post.content,
            image_url: post.image_url,
            likes: liked_by.len(),
            dislikes: disliked_by.len(),
            liked_by,
            disliked_by,
            me,
            created_at: post.created_at,
            updated_at: post.updated_at,
            edited,
        }
    }
}

impl ReactionSummaryResponse {
    pub fn new(post_id: Snowflake, reactions: ReactionSet, viewer: Option<Snowflake>) -> Self {
        Self {
            post_id,
            likes: reactions.likes(),
            dislikes: reactions.dislikes(),
            me: viewer.and_then(|id| reactions.state_of(id)),
            liked_by: reactions.liked_by,
            disliked_by: reactions.disliked_by,
        }
    }
}
