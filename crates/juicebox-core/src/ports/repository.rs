use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{
    NewPost, NewUser, Post, PostChanges, PostId, Tag, User, UserChanges, UserId, UserProfile,
};
use crate::error::{DomainError, RepoError};

/// User store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Public profiles of every user.
    async fn list(&self) -> Result<Vec<UserProfile>, RepoError>;

    /// Insert and read back a user. `None` when the username is taken.
    async fn create(&self, user: NewUser) -> Result<Option<User>, RepoError>;

    /// Apply the present fields. `None` when `changes` is empty or the user
    /// does not exist.
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, RepoError>;
}

/// Post store. Every read returns hydrated posts (author and tags).
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post and attach its tags in one transaction.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError>;

    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    async fn list_by_author(&self, author_id: UserId) -> Result<Vec<Post>, RepoError>;

    async fn list_by_tag_name(&self, name: &str) -> Result<Vec<Post>, RepoError>;

    /// Merge `changes` into the post in one transaction and return the
    /// reloaded post. Fails with `RepoError::NotFound` for unknown ids.
    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, RepoError>;

    /// Like `find_by_id`, but an unknown id is a `PostNotFound` failure.
    async fn get_by_id(&self, id: PostId) -> Result<Post, DomainError> {
        self.find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }
}

/// Tag store.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Idempotent bulk upsert. Returns the rows for every requested name,
    /// keyed by name; an empty request returns an empty map.
    async fn upsert(&self, names: &[String]) -> Result<BTreeMap<String, Tag>, RepoError>;

    async fn list(&self) -> Result<Vec<Tag>, RepoError>;
}
