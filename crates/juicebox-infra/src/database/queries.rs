//! Query building blocks shared by the PostgreSQL repositories.
//!
//! Everything here is generic over [`ConnectionTrait`] so the same code runs
//! against the pool or inside a transaction.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};

use juicebox_core::domain::{Post, PostId, Tag, TagId, UserProfile};
use juicebox_core::error::RepoError;
use juicebox_core::mutation::{TagReconciliation, normalize_tag_names};

use super::entity::{post, post_tag, tag, user};

pub(crate) fn repo_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg))
        | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => RepoError::Constraint(msg),
        _ => match err {
            DbErr::Conn(e) => RepoError::Connection(e.to_string()),
            DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
            other => RepoError::Query(other.to_string()),
        },
    }
}

/// Attach authors and tags to post rows, preserving row order.
pub(crate) async fn hydrate<C>(conn: &C, rows: Vec<post::Model>) -> Result<Vec<Post>, DbErr>
where
    C: ConnectionTrait,
{
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let author_ids: BTreeSet<i32> = rows.iter().map(|r| r.author_id).collect();
    let authors: HashMap<i32, UserProfile> = user::Entity::find()
        .filter(user::Column::Id.is_in(author_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|m| (m.id, UserProfile::from(m)))
        .collect();

    let post_ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    let links = post_tag::Entity::find()
        .filter(post_tag::Column::PostId.is_in(post_ids))
        .all(conn)
        .await?;

    let tag_ids: BTreeSet<i32> = links.iter().map(|l| l.tag_id).collect();
    let tags: HashMap<i32, Tag> = if tag_ids.is_empty() {
        HashMap::new()
    } else {
        tag::Entity::find()
            .filter(tag::Column::Id.is_in(tag_ids))
            .order_by_asc(tag::Column::Id)
            .all(conn)
            .await?
            .into_iter()
            .map(|m| (m.id, Tag::from(m)))
            .collect()
    };

    let mut tags_by_post: HashMap<i32, Vec<Tag>> = HashMap::new();
    for link in links {
        if let Some(tag) = tags.get(&link.tag_id) {
            tags_by_post.entry(link.post_id).or_default().push(tag.clone());
        }
    }

    rows.into_iter()
        .map(|row| {
            let author = authors.get(&row.author_id).cloned().ok_or_else(|| {
                DbErr::RecordNotFound(format!("author {} of post {}", row.author_id, row.id))
            })?;
            let mut tags = tags_by_post.remove(&row.id).unwrap_or_default();
            tags.sort_by_key(|t| t.id);

            Ok(Post {
                id: row.id,
                title: row.title,
                content: row.content,
                active: row.active,
                author,
                tags,
            })
        })
        .collect()
}

/// Load one hydrated post.
pub(crate) async fn load_post<C>(conn: &C, id: PostId) -> Result<Option<Post>, DbErr>
where
    C: ConnectionTrait,
{
    let Some(row) = post::Entity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };
    Ok(hydrate(conn, vec![row]).await?.pop())
}

/// Insert any missing tags, then read back every requested one.
pub(crate) async fn upsert_tags<C>(
    conn: &C,
    names: &[String],
) -> Result<BTreeMap<String, Tag>, DbErr>
where
    C: ConnectionTrait,
{
    let names = normalize_tag_names(names);
    if names.is_empty() {
        return Ok(BTreeMap::new());
    }

    tag::Entity::insert_many(names.iter().map(|name| tag::ActiveModel {
        name: Set(name.clone()),
        ..Default::default()
    }))
    .on_conflict(OnConflict::column(tag::Column::Name).do_nothing().to_owned())
    .exec_without_returning(conn)
    .await?;

    let rows = tag::Entity::find()
        .filter(tag::Column::Name.is_in(names))
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|m| (m.name.clone(), Tag::from(m)))
        .collect())
}

/// Add associations; pairs that already exist are left alone.
pub(crate) async fn attach_tags<C>(conn: &C, post_id: PostId, tag_ids: &[TagId]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if tag_ids.is_empty() {
        return Ok(());
    }

    post_tag::Entity::insert_many(tag_ids.iter().map(|&tag_id| post_tag::ActiveModel {
        post_id: Set(post_id),
        tag_id: Set(tag_id),
    }))
    .on_conflict(
        OnConflict::columns([post_tag::Column::PostId, post_tag::Column::TagId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await?;

    Ok(())
}

/// Make the post's associations exactly `requested`.
pub(crate) async fn replace_tags<C>(
    conn: &C,
    post_id: PostId,
    requested: impl IntoIterator<Item = TagId>,
) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let current = post_tag::Entity::find()
        .filter(post_tag::Column::PostId.eq(post_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|l| l.tag_id);

    let plan = TagReconciliation::plan(current, requested);
    if plan.is_noop() {
        return Ok(());
    }

    if !plan.detach.is_empty() {
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .filter(post_tag::Column::TagId.is_in(plan.detach))
            .exec(conn)
            .await?;
    }

    attach_tags(conn, post_id, &plan.attach).await
}
