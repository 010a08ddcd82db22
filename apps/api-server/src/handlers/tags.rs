//! Tag handlers.

use actix_web::{HttpResponse, web};
use serde_json::json;

use juicebox_core::DomainError;
use juicebox_core::service::posts as service;

use crate::middleware::auth::MaybeViewer;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/tags
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state
        .timed(async { state.tags.list().await.map_err(DomainError::from) })
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "tags": tags })))
}

/// GET /api/tags/{name}/posts
///
/// `#` must be percent-encoded by the client, e.g. `/api/tags/%23happy/posts`.
pub async fn posts_by_tag(
    state: web::Data<AppState>,
    viewer: MaybeViewer,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let name = path.into_inner();
    let posts = state
        .timed(service::list_posts_by_tag(
            state.posts.as_ref(),
            &name,
            viewer.get(),
        ))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "posts": posts })))
}
