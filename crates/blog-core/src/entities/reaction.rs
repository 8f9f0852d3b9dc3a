//! Reactions - the like/dislike sets carried by every post

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Kind of reaction a user can leave on a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }

    /// The reaction that excludes this one
    pub const fn opposite(self) -> Self {
        match self {
            Self::Like => Self::Dislike,
            Self::Dislike => Self::Like,
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            other => Err(DomainError::InvalidReactionKind(other.to_string())),
        }
    }
}

/// Result of applying a toggle to a [`ReactionSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The user had no reaction and now has the requested one
    Added,
    /// The user had the requested reaction and it was removed
    Removed,
    /// The user had the opposite reaction; it was replaced by the requested one
    Switched,
}

/// Users who liked and disliked a post.
///
/// Both lists keep insertion order and never hold duplicates. A user id is in
/// at most one of them at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionSet {
    pub liked_by: Vec<Snowflake>,
    pub disliked_by: Vec<Snowflake>,
}

impl ReactionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a set from stored lists, dropping duplicates and resolving any
    /// user found in both lists in favour of the like.
    pub fn from_lists(liked_by: Vec<Snowflake>, disliked_by: Vec<Snowflake>) -> Self {
        let mut set = Self::default();
        for user in liked_by {
            if !set.liked_by.contains(&user) {
                set.liked_by.push(user);
            }
        }
        for user in disliked_by {
            if !set.liked_by.contains(&user) && !set.disliked_by.contains(&user) {
                set.disliked_by.push(user);
            }
        }
        set
    }

    fn list(&self, kind: ReactionKind) -> &Vec<Snowflake> {
        match kind {
            ReactionKind::Like => &self.liked_by,
            ReactionKind::Dislike => &self.disliked_by,
        }
    }

    fn list_mut(&mut self, kind: ReactionKind) -> &mut Vec<Snowflake> {
        match kind {
            ReactionKind::Like => &mut self.liked_by,
            ReactionKind::Dislike => &mut self.disliked_by,
        }
    }

    /// Toggle `kind` for `user`.
    ///
    /// If the user already holds `kind` it is removed. Otherwise the user is
    /// added to `kind` and removed from the opposite list.
    pub fn toggle(&mut self, user: Snowflake, kind: ReactionKind) -> ToggleOutcome {
        let requested = self.list_mut(kind);
        if let Some(pos) = requested.iter().position(|id| *id == user) {
            requested.remove(pos);
            return ToggleOutcome::Removed;
        }
        requested.push(user);

        let opposite = self.list_mut(kind.opposite());
        match opposite.iter().position(|id| *id == user) {
            Some(pos) => {
                opposite.remove(pos);
                ToggleOutcome::Switched
            }
            None => ToggleOutcome::Added,
        }
    }

    /// Current reaction of `user`, if any
    pub fn state_of(&self, user: Snowflake) -> Option<ReactionKind> {
        if self.liked_by.contains(&user) {
            Some(ReactionKind::Like)
        } else if self.disliked_by.contains(&user) {
            Some(ReactionKind::Dislike)
        } else {
            None
        }
    }

    pub fn has(&self, user: Snowflake, kind: ReactionKind) -> bool {
        self.list(kind).contains(&user)
    }

    pub fn likes(&self) -> usize {
        self.liked_by.len()
    }

    pub fn dislikes(&self) -> usize {
        self.disliked_by.len()
    }
}
