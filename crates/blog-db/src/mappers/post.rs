//! Post model -> entity

use blog_core::entities::{Post, ReactionSet};
use blog_core::value_objects::Snowflake;

use crate::models::{PostModel, ReactionListsModel};

fn ids_to_snowflakes(ids: Vec<i64>) -> Vec<Snowflake> {
    ids.into_iter().map(Snowflake::new).collect()
}

/// Convert reaction ids for binding to a `BIGINT[]` column
pub fn snowflakes_to_ids(ids: &[Snowflake]) -> Vec<i64> {
    ids.iter().map(|id| id.into_inner()).collect()
}

impl From<ReactionListsModel> for ReactionSet {
    fn from(model: ReactionListsModel) -> Self {
        ReactionSet::from_lists(
            ids_to_snowflakes(model.liked_by),
            ids_to_snowflakes(model.disliked_by),
        )
    }
}

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: Snowflake::new(model.id),
            author_id: Snowflake::new(model.author_id),
            content: model.content,
            image_url: model.image_url,
            image_key: model.image_key,
            reactions: ReactionSet::from(ReactionListsModel {
                liked_by: model.liked_by,
                disliked_by: model.disliked_by,
            }),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
