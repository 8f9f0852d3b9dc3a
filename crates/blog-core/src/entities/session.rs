//! Refresh session - server-side record behind a refresh token

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSession {
    pub user_id: Snowflake,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

impl RefreshSession {
    pub fn new(user_id: Snowflake, session_id: String) -> Self {
        Self {
            user_id,
            session_id,
            created_at: Utc::now(),
        }
    }
}
