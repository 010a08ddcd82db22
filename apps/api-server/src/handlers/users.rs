//! User and authentication handlers.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;

use juicebox_core::domain::{Post, UserId, UserProfile};
use juicebox_core::service::{Registration, users as service};
use juicebox_shared::dto::{AuthResponse, LoginRequest, RegisterRequest};

use crate::middleware::auth::MaybeViewer;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Profile plus the posts the viewer may see.
#[derive(Serialize)]
struct UserDetail {
    #[serde(flatten)]
    profile: UserProfile,
    posts: Vec<Post>,
}

/// GET /api/users
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = state
        .timed(service::list_users(state.users.as_ref()))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

/// POST /api/users/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let signed_in = state
        .timed(service::login(
            state.users.as_ref(),
            state.passwords.as_ref(),
            state.tokens.as_ref(),
            &req.username,
            &req.password,
        ))
        .await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "you're logged in!".to_string(),
        token: signed_in.token,
    }))
}

/// POST /api/users/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let form = Registration {
        username: req.username,
        password: req.password,
        name: req.name,
        location: req.location,
    };

    let signed_in = state
        .timed(service::register(
            state.users.as_ref(),
            state.passwords.as_ref(),
            state.tokens.as_ref(),
            form,
        ))
        .await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "thank you for signing up".to_string(),
        token: signed_in.token,
    }))
}

/// GET /api/users/{id}
pub async fn detail(
    state: web::Data<AppState>,
    viewer: MaybeViewer,
    path: web::Path<UserId>,
) -> AppResult<HttpResponse> {
    let (profile, posts) = state
        .timed(service::user_detail(
            state.users.as_ref(),
            state.posts.as_ref(),
            viewer.get(),
            path.into_inner(),
        ))
        .await?;

    let user = UserDetail { profile, posts };
    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

/// DELETE /api/users/{id}
pub async fn deactivate(
    state: web::Data<AppState>,
    viewer: MaybeViewer,
    path: web::Path<UserId>,
) -> AppResult<HttpResponse> {
    let user = state
        .timed(service::deactivate_user(
            state.users.as_ref(),
            viewer.get(),
            path.into_inner(),
        ))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

/// PATCH /api/users/{id}
pub async fn reactivate(
    state: web::Data<AppState>,
    viewer: MaybeViewer,
    path: web::Path<UserId>,
) -> AppResult<HttpResponse> {
    let user = state
        .timed(service::reactivate_user(
            state.users.as_ref(),
            viewer.get(),
            path.into_inner(),
        ))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}
