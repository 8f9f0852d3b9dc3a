//! Model to entity mappers
//!
//! `From<Model> for Entity` converts database rows to domain objects.

mod post;
mod user;

pub use post::snowflakes_to_ids;
