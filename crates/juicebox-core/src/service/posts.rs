//! Post operations.

use crate::domain::{NewPost, Post, PostChanges, PostId, Viewer};
use crate::error::{DomainError, RepoError};
use crate::policy::{require_active_viewer, require_owner, require_viewer};
use crate::ports::PostRepository;
use crate::visibility::retain_visible;

use super::require_text;

/// A post as submitted by its author.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Every post the viewer may see.
pub async fn list_posts(
    posts: &dyn PostRepository,
    viewer: Option<&Viewer>,
) -> Result<Vec<Post>, DomainError> {
    let all = posts.list().await?;
    Ok(retain_visible(all, viewer))
}

/// Visible posts carrying `tag_name`; an empty result is `NoPostsMatchTag`.
pub async fn list_posts_by_tag(
    posts: &dyn PostRepository,
    tag_name: &str,
    viewer: Option<&Viewer>,
) -> Result<Vec<Post>, DomainError> {
    let tagged = retain_visible(posts.list_by_tag_name(tag_name).await?, viewer);
    if tagged.is_empty() {
        return Err(DomainError::NoPostsMatchTag(tag_name.to_string()));
    }
    Ok(tagged)
}

#[tracing::instrument(skip(posts, viewer, draft), fields(viewer_id = viewer.map(|v| v.id)))]
pub async fn create_post(
    posts: &dyn PostRepository,
    viewer: Option<&Viewer>,
    draft: PostDraft,
) -> Result<Post, DomainError> {
    let viewer = require_viewer(viewer)?;
    require_active_viewer(viewer)?;
    require_text("title", &draft.title)?;
    require_text("content", &draft.content)?;

    let post = posts
        .create(NewPost {
            author_id: viewer.id,
            title: draft.title,
            content: draft.content,
            tags: draft.tags,
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create post");
            DomainError::CreatePostFailed
        })?;

    tracing::debug!(post_id = post.id, "Post created");
    Ok(post)
}

#[tracing::instrument(skip(posts, viewer, changes), fields(viewer_id = viewer.map(|v| v.id)))]
pub async fn update_post(
    posts: &dyn PostRepository,
    viewer: Option<&Viewer>,
    id: PostId,
    changes: PostChanges,
) -> Result<Post, DomainError> {
    let viewer = require_viewer(viewer)?;
    require_active_viewer(viewer)?;
    if let Some(title) = &changes.title {
        require_text("title", title)?;
    }
    if let Some(content) = &changes.content {
        require_text("content", content)?;
    }

    let original = posts.get_by_id(id).await?;
    require_owner(&original, viewer, "You cannot update a post that is not yours")?;

    apply(posts, id, changes).await
}

/// Soft-delete: the post stays in the store with `active = false`.
#[tracing::instrument(skip(posts, viewer), fields(viewer_id = viewer.map(|v| v.id)))]
pub async fn delete_post(
    posts: &dyn PostRepository,
    viewer: Option<&Viewer>,
    id: PostId,
) -> Result<Post, DomainError> {
    let viewer = require_viewer(viewer)?;
    require_active_viewer(viewer)?;

    let post = posts.get_by_id(id).await?;
    require_owner(&post, viewer, "You cannot delete a post which is not yours")?;

    apply(posts, id, PostChanges::deactivate()).await
}

async fn apply(
    posts: &dyn PostRepository,
    id: PostId,
    changes: PostChanges,
) -> Result<Post, DomainError> {
    posts.update(id, changes).await.map_err(|e| match e {
        RepoError::NotFound => DomainError::PostNotFound(id),
        other => DomainError::Store(other),
    })
}
