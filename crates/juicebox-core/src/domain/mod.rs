//! Domain entities - the core business objects.

mod post;
mod tag;
mod user;

pub use post::{NewPost, Post, PostChanges, PostId};
pub use tag::{Tag, TagId, parse_tag_list};
pub use user::{NewUser, User, UserChanges, UserId, UserProfile, Viewer};
