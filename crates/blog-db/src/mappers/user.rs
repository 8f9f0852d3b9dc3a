//! User model -> entity

use blog_core::entities::User;
use blog_core::value_objects::Snowflake;

use crate::models::UserModel;

/// The password hash is dropped; it is only read through `get_password_hash`
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            email: model.email,
            avatar: model.avatar,
            bio: model.bio,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
