//! Read-time visibility of posts.
//!
//! Soft-deletion never cascades from users to posts; instead a post is hidden
//! when either it or its author is inactive, unless the viewer owns it.

use crate::domain::{Post, Viewer};

/// Whether `viewer` may see `post` in a listing.
pub fn is_visible(post: &Post, viewer: Option<&Viewer>) -> bool {
    let published = post.active && post.author.active;
    let owned = viewer.is_some_and(|v| v.id == post.author.id);
    published || owned
}

/// Keep only the posts `viewer` may see, preserving order.
pub fn retain_visible(mut posts: Vec<Post>, viewer: Option<&Viewer>) -> Vec<Post> {
    posts.retain(|post| is_visible(post, viewer));
    posts
}
