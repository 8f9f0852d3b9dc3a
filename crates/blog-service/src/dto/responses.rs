//! Response DTOs for API endpoints
//!
//! Snowflake IDs serialize as strings for JavaScript compatibility.

use std::collections::BTreeMap;

use blog_core::{ReactionKind, Snowflake};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CurrentUserResponse,
}

// ============================================================================
// User Responses
// ============================================================================

/// Public profile
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Snowflake,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The authenticated user's own profile, including email
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: Snowflake,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Post Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub image_url: Option<String>,
    pub likes: usize,
    pub dislikes: usize,
    pub liked_by: Vec<Snowflake>,
    pub disliked_by: Vec<Snowflake>,
    /// The caller's own reaction; always `null` for anonymous callers
    pub me: Option<ReactionKind>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub edited: bool,
}

// ============================================================================
// Reaction Responses
// ============================================================================

/// Acknowledgement of a reaction toggle
#[derive(Debug, Clone, Serialize)]
pub struct ReactionToggleResponse {
    pub post_id: Snowflake,
    /// The kind that was requested
    #[serde(rename = "type")]
    pub kind: ReactionKind,
    /// Whether `kind` is set after the toggle
    pub active: bool,
    /// The caller's resulting reaction
    pub me: Option<ReactionKind>,
    pub likes: usize,
    pub dislikes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionSummaryResponse {
    pub post_id: Snowflake,
    pub likes: usize,
    pub dislikes: usize,
    pub liked_by: Vec<Snowflake>,
    pub disliked_by: Vec<Snowflake>,
    pub me: Option<ReactionKind>,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Probe name to `healthy` / `unhealthy`
    pub checks: BTreeMap<String, String>,
}

impl ReadinessResponse {
    pub fn from_checks(results: impl IntoIterator<Item = (&'static str, bool)>) -> Self {
        let checks: BTreeMap<String, String> = results
            .into_iter()
            .map(|(name, healthy)| {
                let state = if healthy { "healthy" } else { "unhealthy" };
                (name.to_string(), state.to_string())
            })
            .collect();
        let ready = checks.values().all(|state| state == "healthy");

        Self {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
