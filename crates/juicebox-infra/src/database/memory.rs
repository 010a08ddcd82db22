//! In-memory store - used as fallback when no database is configured, and in
//! tests.
//!
//! A single async `RwLock` guards all four relations, so every operation
//! (including multi-relation mutations) is atomic with respect to others.
//! Note: Data is lost on process restart.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use juicebox_core::domain::{
    NewPost, NewUser, Post, PostChanges, PostId, Tag, TagId, User, UserChanges, UserId,
    UserProfile,
};
use juicebox_core::error::RepoError;
use juicebox_core::mutation::{TagReconciliation, normalize_tag_names};
use juicebox_core::ports::{PostRepository, TagRepository, UserRepository};

#[derive(Debug, Clone)]
struct PostRow {
    id: PostId,
    author_id: UserId,
    title: String,
    content: String,
    active: bool,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, PostRow>,
    tags: BTreeMap<TagId, Tag>,
    post_tags: BTreeSet<(PostId, TagId)>,
    last_user_id: UserId,
    last_post_id: PostId,
    last_tag_id: TagId,
}

impl Tables {
    fn hydrate(&self, row: &PostRow) -> Result<Post, RepoError> {
        let author = self
            .users
            .get(&row.author_id)
            .map(User::profile)
            .ok_or_else(|| RepoError::Query(format!("author {} missing", row.author_id)))?;

        let tags = self
            .post_tags
            .range((row.id, TagId::MIN)..=(row.id, TagId::MAX))
            .filter_map(|(_, tag_id)| self.tags.get(tag_id).cloned())
            .collect();

        Ok(Post {
            id: row.id,
            title: row.title.clone(),
            content: row.content.clone(),
            active: row.active,
            author,
            tags,
        })
    }

    fn hydrate_where(&self, keep: impl Fn(&PostRow) -> bool) -> Result<Vec<Post>, RepoError> {
        self.posts
            .values()
            .filter(|&row| keep(row))
            .map(|row| self.hydrate(row))
            .collect()
    }

    fn upsert_tags(&mut self, names: &[String]) -> BTreeMap<String, Tag> {
        let mut resolved = BTreeMap::new();
        for name in normalize_tag_names(names) {
            let existing = self.tags.values().find(|t| t.name == name).cloned();
            let tag = match existing {
                Some(tag) => tag,
                None => {
                    self.last_tag_id += 1;
                    let tag = Tag {
                        id: self.last_tag_id,
                        name: name.clone(),
                    };
                    self.tags.insert(tag.id, tag.clone());
                    tag
                }
            };
            resolved.insert(name, tag);
        }
        resolved
    }

    fn replace_tags(&mut self, post_id: PostId, requested: impl IntoIterator<Item = TagId>) {
        let current: Vec<TagId> = self
            .post_tags
            .range((post_id, TagId::MIN)..=(post_id, TagId::MAX))
            .map(|&(_, tag_id)| tag_id)
            .collect();

        let plan = TagReconciliation::plan(current, requested);
        for tag_id in plan.detach {
            self.post_tags.remove(&(post_id, tag_id));
        }
        for tag_id in plan.attach {
            self.post_tags.insert((post_id, tag_id));
        }
    }
}

/// In-memory implementation of every store port.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<UserProfile>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().map(User::profile).collect())
    }

    async fn create(&self, new_user: NewUser) -> Result<Option<User>, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == new_user.username) {
            return Ok(None);
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            username: new_user.username,
            password_hash: new_user.password_hash,
            name: new_user.name,
            location: new_user.location,
            active: true,
        };
        tables.users.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, RepoError> {
        if changes.is_empty() {
            return Ok(None);
        }

        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(location) = changes.location {
            user.location = location;
        }
        if let Some(active) = changes.active {
            user.active = active;
        }
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&new_post.author_id) {
            return Err(RepoError::Constraint(format!(
                "author {} does not exist",
                new_post.author_id
            )));
        }

        tables.last_post_id += 1;
        let row = PostRow {
            id: tables.last_post_id,
            author_id: new_post.author_id,
            title: new_post.title,
            content: new_post.content,
            active: true,
        };
        tables.posts.insert(row.id, row.clone());

        let tag_ids: Vec<TagId> = tables
            .upsert_tags(&new_post.tags)
            .values()
            .map(|t| t.id)
            .collect();
        tables.replace_tags(row.id, tag_ids);

        tables.hydrate(&row)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        tables.posts.get(&id).map(|row| tables.hydrate(row)).transpose()
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        self.tables.read().await.hydrate_where(|_| true)
    }

    async fn list_by_author(&self, author_id: UserId) -> Result<Vec<Post>, RepoError> {
        self.tables
            .read()
            .await
            .hydrate_where(|row| row.author_id == author_id)
    }

    async fn list_by_tag_name(&self, name: &str) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let Some(tag_id) = tables.tags.values().find(|t| t.name == name).map(|t| t.id) else {
            return Ok(Vec::new());
        };
        tables.hydrate_where(|row| tables.post_tags.contains(&(row.id, tag_id)))
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.posts.get_mut(&id) else {
            return Err(RepoError::NotFound);
        };

        if let Some(title) = changes.title {
            row.title = title;
        }
        if let Some(content) = changes.content {
            row.content = content;
        }
        if let Some(active) = changes.active {
            row.active = active;
        }
        let row = row.clone();

        if let Some(names) = changes.tags {
            let tag_ids: Vec<TagId> = tables.upsert_tags(&names).values().map(|t| t.id).collect();
            tables.replace_tags(id, tag_ids);
        }

        tables.hydrate(&row)
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn upsert(&self, names: &[String]) -> Result<BTreeMap<String, Tag>, RepoError> {
        Ok(self.tables.write().await.upsert_tags(names))
    }

    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_user(store: &InMemoryStore, username: &str) -> User {
        UserRepository::create(
            store,
            NewUser {
                username: username.to_string(),
                password_hash: "hash".to_string(),
                name: "Name".to_string(),
                location: "Place".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_create_user_with_taken_username_returns_none() {
        let store = InMemoryStore::new();
        seed_user(&store, "sandra").await;

        let again = UserRepository::create(
            &store,
            NewUser {
                username: "sandra".to_string(),
                password_hash: "other".to_string(),
                name: "Other".to_string(),
                location: "Elsewhere".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(again.is_none());
    }

    #[tokio::test]
    async fn test_update_user_with_no_changes_is_noop() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "sandra").await;

        let result = UserRepository::update(&store, user.id, UserChanges::default())
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_tag_upsert_is_idempotent() {
        let store = InMemoryStore::new();

        let first = store.upsert(&names(&["#a", "#b"])).await.unwrap();
        let second = store.upsert(&names(&["#b", "#a"])).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(TagRepository::list(&store).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_tag_upsert_empty_request_returns_empty_map() {
        let store = InMemoryStore::new();
        assert!(store.upsert(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_post_with_unknown_author_fails() {
        let store = InMemoryStore::new();

        let result = PostRepository::create(
            &store,
            NewPost {
                author_id: 42,
                title: "T".to_string(),
                content: "C".to_string(),
                tags: names(&["#a"]),
            },
        )
        .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
        // Nothing half-written.
        assert!(TagRepository::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_post_is_not_found() {
        let store = InMemoryStore::new();
        let result = PostRepository::update(&store, 9, PostChanges::deactivate()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
