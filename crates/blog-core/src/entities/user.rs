//! User entity - an account that writes and reacts to posts

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// User account. The password hash is kept by the repository, never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub const USERNAME_MIN: usize = 3;
    pub const USERNAME_MAX: usize = 32;
    pub const BIO_MAX: usize = 500;

    pub fn new(id: Snowflake, username: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            avatar: None,
            bio: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_username(&mut self, username: String) {
        self.username = username;
        self.updated_at = Utc::now();
    }

    pub fn set_avatar(&mut self, avatar: Option<String>) {
        self.avatar = avatar;
        self.updated_at = Utc::now();
    }

    pub fn set_bio(&mut self, bio: Option<String>) {
        self.bio = bio;
        self.updated_at = Utc::now();
    }

    /// Usernames are 3-32 characters of ASCII letters, digits, `_`, `.` or `-`
    pub fn is_valid_username(username: &str) -> bool {
        (Self::USERNAME_MIN..=Self::USERNAME_MAX).contains(&username.chars().count())
            && username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    }
}
