//! Path parameter extractors
//!
//! Ids arrive as strings and are parsed into Snowflakes by the handler, so a
//! malformed id is a 400 rather than a routing miss.

use blog_core::Snowflake;
use serde::Deserialize;

use crate::response::ApiError;

/// Path parameters with post_id
#[derive(Debug, Deserialize)]
pub struct PostIdPath {
    pub post_id: String,
}

impl PostIdPath {
    pub fn post_id(&self) -> Result<Snowflake, ApiError> {
        self.post_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid post_id format"))
    }
}

/// Path parameters with user_id
#[derive(Debug, Deserialize)]
pub struct UserIdPath {
    pub user_id: String,
}

impl UserIdPath {
    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        self.user_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid user_id format"))
    }
}
