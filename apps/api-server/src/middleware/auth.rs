//! Viewer resolution from the `Authorization` header.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;

use juicebox_core::DomainError;
use juicebox_core::domain::Viewer;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// The viewer of the current request, if any.
///
/// No `Authorization` header means an anonymous viewer. A header that is
/// present but unusable is rejected rather than treated as anonymous, as is a
/// valid token whose user no longer exists. The user is loaded on every
/// request so the `active` flag is always current.
///
/// ```ignore
/// async fn list(state: web::Data<AppState>, viewer: MaybeViewer) -> AppResult<HttpResponse> {
///     let posts = state.timed(posts::list_posts(state.posts.as_ref(), viewer.get())).await?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MaybeViewer(pub Option<Viewer>);

impl MaybeViewer {
    pub fn get(&self) -> Option<&Viewer> {
        self.0.as_ref()
    }
}

impl FromRequest for MaybeViewer {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let Some(token) = token? else {
                return Ok(MaybeViewer(None));
            };

            let state = state.ok_or_else(|| {
                tracing::error!("AppState not found in app data");
                AppError::Internal("Server configuration error".to_string())
            })?;

            let claims = state
                .tokens
                .validate_token(&token)
                .map_err(DomainError::from)?;

            let user = state
                .timed(async {
                    state
                        .users
                        .find_by_id(claims.user_id)
                        .await
                        .map_err(DomainError::from)
                })
                .await?
                .ok_or(DomainError::Unauthenticated)?;

            tracing::debug!(user_id = user.id, active = user.active, "Viewer resolved");
            Ok(MaybeViewer(Some(Viewer::from(&user))))
        })
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(req: &HttpRequest) -> Result<Option<String>, AppError> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| DomainError::InvalidToken("Invalid authorization header".to_string()))?;

    match value.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(Some(token.to_string())),
        _ => Err(DomainError::Unauthenticated.into()),
    }
}
