//! PostgreSQL repository implementations.
//!
//! Multi-statement mutations run inside a transaction; returning early with
//! an error drops the transaction, which rolls it back.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DbConn, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use juicebox_core::domain::{
    NewPost, NewUser, Post, PostChanges, PostId, Tag, User, UserChanges, UserId, UserProfile,
};
use juicebox_core::error::RepoError;
use juicebox_core::ports::{PostRepository, TagRepository, UserRepository};

use super::entity::{post, tag, user};
use super::queries::{attach_tags, hydrate, load_post, replace_tags, repo_err, upsert_tags};

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: Arc<DbConn>,
}

impl PostgresUserRepository {
    pub fn new(db: impl Into<Arc<DbConn>>) -> Self {
        Self { db: db.into() }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let result = user::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<UserProfile>, RepoError> {
        let rows = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_user: NewUser) -> Result<Option<User>, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let inserted = user::Entity::insert(user::ActiveModel {
            username: Set(new_user.username.clone()),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name),
            location: Set(new_user.location),
            active: Set(true),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(user::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await
        .map_err(repo_err)?;

        if inserted == 0 {
            tracing::debug!(username = %new_user.username, "Username already taken");
            return Ok(None);
        }

        let created = user::Entity::find()
            .filter(user::Column::Username.eq(new_user.username))
            .one(&txn)
            .await
            .map_err(repo_err)?;

        txn.commit().await.map_err(repo_err)?;
        Ok(created.map(Into::into))
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, RepoError> {
        if changes.is_empty() {
            return Ok(None);
        }

        let mut model = user::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            model.name = Set(name);
        }
        if let Some(location) = changes.location {
            model.location = Set(location);
        }
        if let Some(active) = changes.active {
            model.active = Set(active);
        }

        match model.update(self.db.as_ref()).await {
            Ok(updated) => Ok(Some(updated.into())),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(repo_err(e)),
        }
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: Arc<DbConn>,
}

impl PostgresPostRepository {
    pub fn new(db: impl Into<Arc<DbConn>>) -> Self {
        Self { db: db.into() }
    }

    #[cfg(test)]
    pub(crate) fn into_connection(self) -> DbConn {
        Arc::try_unwrap(self.db)
            .ok()
            .expect("connection is shared")
    }

    async fn hydrate_all(&self, rows: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        hydrate(self.db.as_ref(), rows).await.map_err(repo_err)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let row = post::ActiveModel {
            author_id: Set(new_post.author_id),
            title: Set(new_post.title),
            content: Set(new_post.content),
            active: Set(true),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(repo_err)?;

        let tags = upsert_tags(&txn, &new_post.tags).await.map_err(repo_err)?;
        let tag_ids: Vec<i32> = tags.values().map(|t| t.id).collect();
        attach_tags(&txn, row.id, &tag_ids)
            .await
            .map_err(repo_err)?;

        let post = load_post(&txn, row.id)
            .await
            .map_err(repo_err)?
            .ok_or(RepoError::NotFound)?;

        txn.commit().await.map_err(repo_err)?;
        tracing::debug!(post_id = post.id, tags = tag_ids.len(), "Post inserted");
        Ok(post)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        load_post(self.db.as_ref(), id).await.map_err(repo_err)
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let rows = post::Entity::find()
            .order_by_asc(post::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        self.hydrate_all(rows).await
    }

    async fn list_by_author(&self, author_id: UserId) -> Result<Vec<Post>, RepoError> {
        let rows = post::Entity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_asc(post::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        self.hydrate_all(rows).await
    }

    async fn list_by_tag_name(&self, name: &str) -> Result<Vec<Post>, RepoError> {
        let rows = post::Entity::find()
            .inner_join(tag::Entity)
            .filter(tag::Column::Name.eq(name))
            .order_by_asc(post::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        self.hydrate_all(rows).await
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        // Row lock serializes concurrent updates of the same post.
        let exists = post::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(repo_err)?
            .is_some();
        if !exists {
            return Err(RepoError::NotFound);
        }

        if changes.has_scalar_changes() {
            let mut model = post::ActiveModel {
                id: Unchanged(id),
                ..Default::default()
            };
            if let Some(title) = changes.title {
                model.title = Set(title);
            }
            if let Some(content) = changes.content {
                model.content = Set(content);
            }
            if let Some(active) = changes.active {
                model.active = Set(active);
            }
            model.update(&txn).await.map_err(repo_err)?;
        }

        if let Some(names) = changes.tags {
            let resolved = upsert_tags(&txn, &names).await.map_err(repo_err)?;
            replace_tags(&txn, id, resolved.values().map(|t| t.id))
                .await
                .map_err(repo_err)?;
        }

        let post = load_post(&txn, id)
            .await
            .map_err(repo_err)?
            .ok_or(RepoError::NotFound)?;

        txn.commit().await.map_err(repo_err)?;
        Ok(post)
    }
}

/// PostgreSQL tag repository.
pub struct PostgresTagRepository {
    db: Arc<DbConn>,
}

impl PostgresTagRepository {
    pub fn new(db: impl Into<Arc<DbConn>>) -> Self {
        Self { db: db.into() }
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn upsert(&self, names: &[String]) -> Result<BTreeMap<String, Tag>, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;
        let tags = upsert_tags(&txn, names).await.map_err(repo_err)?;
        txn.commit().await.map_err(repo_err)?;
        Ok(tags)
    }

    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let rows = tag::Entity::find()
            .order_by_asc(tag::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(repo_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
