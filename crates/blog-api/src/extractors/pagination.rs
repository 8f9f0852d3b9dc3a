//! Pagination extractor
//!
//! Extracts cursor-based pagination parameters from query strings.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use blog_core::{PostQuery, Snowflake};
use serde::Deserialize;

use crate::response::ApiError;

/// Default page size
const DEFAULT_LIMIT: i32 = 50;
/// Maximum page size
const MAX_LIMIT: i32 = 100;

/// Raw pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    /// Get items older than this ID
    #[serde(default)]
    pub before: Option<String>,
    /// Get items newer than this ID
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub limit: Option<i32>,
}

/// Validated pagination parameters
#[derive(Debug, Clone)]
pub struct Pagination {
    pub before: Option<Snowflake>,
    pub after: Option<Snowflake>,
    /// Page size, clamped to 1..=100
    pub limit: i32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            before: None,
            after: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Build a post query, optionally restricted to one author
    pub fn into_query(self, author_id: Option<Snowflake>) -> PostQuery {
        PostQuery {
            before: self.before,
            after: self.after,
            author_id,
            limit: i64::from(self.limit),
        }
    }
}

fn parse_cursor(value: Option<String>, name: &str) -> Result<Option<Snowflake>, ApiError> {
    value
        .map(|s| {
            s.parse::<Snowflake>()
                .map_err(|_| ApiError::invalid_query(format!("Invalid '{name}' format")))
        })
        .transpose()
}

impl TryFrom<PaginationParams> for Pagination {
    type Error = ApiError;

    fn try_from(params: PaginationParams) -> Result<Self, Self::Error> {
        let before = parse_cursor(params.before, "before")?;
        let after = parse_cursor(params.after, "after")?;
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        Ok(Pagination {
            before,
            after,
            limit,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Pagination::try_from(params)
    }
}

/// `author_id` filter for post listings
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub author_id: Option<Snowflake>,
}

#[derive(Debug, Deserialize)]
struct PostFilterParams {
    #[serde(default)]
    author_id: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for PostFilter
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PostFilterParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Ok(PostFilter {
            author_id: parse_cursor(params.author_id, "author_id")?,
        })
    }
}
