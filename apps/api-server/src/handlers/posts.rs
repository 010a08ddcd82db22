//! Post handlers.

use actix_web::{HttpResponse, web};
use serde_json::json;

use juicebox_core::domain::{PostChanges, PostId, parse_tag_list};
use juicebox_core::service::{PostDraft, posts as service};
use juicebox_shared::dto::{CreatePostRequest, UpdatePostRequest};

use crate::middleware::auth::MaybeViewer;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list(state: web::Data<AppState>, viewer: MaybeViewer) -> AppResult<HttpResponse> {
    let posts = state
        .timed(service::list_posts(state.posts.as_ref(), viewer.get()))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "posts": posts })))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    viewer: MaybeViewer,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let draft = PostDraft {
        title: req.title,
        content: req.content,
        tags: parse_tag_list(req.tags.as_deref().unwrap_or_default()),
    };

    let post = state
        .timed(service::create_post(state.posts.as_ref(), viewer.get(), draft))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "post": post })))
}

/// PATCH /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    viewer: MaybeViewer,
    path: web::Path<PostId>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = PostChanges {
        title: req.title,
        content: req.content,
        active: None,
        tags: req.tags.as_deref().map(parse_tag_list),
    };

    let post = state
        .timed(service::update_post(
            state.posts.as_ref(),
            viewer.get(),
            path.into_inner(),
            changes,
        ))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "post": post })))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    viewer: MaybeViewer,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let post = state
        .timed(service::delete_post(
            state.posts.as_ref(),
            viewer.get(),
            path.into_inner(),
        ))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "post": post })))
}
