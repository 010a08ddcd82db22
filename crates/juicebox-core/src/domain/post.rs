use serde::{Deserialize, Serialize};

use super::tag::Tag;
use super::user::{UserId, UserProfile};

pub type PostId = i32;

/// Post entity, fully hydrated.
///
/// The author is denormalized into a public profile; the raw author id is
/// only reachable through `author.id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub active: bool,
    pub author: UserProfile,
    pub tags: Vec<Tag>,
}

impl Post {
    /// Tag names of this post, sorted.
    pub fn tag_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tags.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Fields required to create a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Partial update of a post.
///
/// `tags: None` leaves the tag set alone; `Some(vec![])` removes every tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub active: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl PostChanges {
    pub fn deactivate() -> Self {
        Self {
            active: Some(false),
            ..Self::default()
        }
    }

    /// Whether any column of the post row itself changes.
    pub fn has_scalar_changes(&self) -> bool {
        self.title.is_some() || self.content.is_some() || self.active.is_some()
    }
}
