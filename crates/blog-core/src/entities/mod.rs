//! Domain entities - core business objects

mod image;
mod post;
mod reaction;
mod session;
mod user;

pub use image::{ImageUpload, StoredImage};
pub use post::Post;
pub use reaction::{ReactionKind, ReactionSet, ToggleOutcome};
pub use session::RefreshSession;
pub use user::User;
