//! Error handling - every failure leaves as `{name, message}`.

use actix_web::{
    HttpRequest, HttpResponse, ResponseError,
    error::{JsonPayloadError, PathError},
    http::StatusCode,
};
use juicebox_core::{DomainError, ErrorKind};
use juicebox_shared::ErrorResponse;

use crate::observability::current_request_id;

/// Application-level error type returned by handlers and extractors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0}")]
    BadRequest(String),

    #[error("The store did not respond in time")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn body(&self) -> ErrorResponse {
        match self {
            AppError::Domain(err @ (DomainError::Store(_) | DomainError::Internal(_))) => {
                tracing::error!(error = %err, "Internal error");
                ErrorResponse::internal_error()
            }
            AppError::Domain(err) => ErrorResponse::new(err.name(), err.to_string()),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Timeout => ErrorResponse::new("StoreTimeout", self.to_string()),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(DomainError::MissingCredentials) => StatusCode::BAD_REQUEST,
            AppError::Domain(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Forbidden | ErrorKind::ViewerDeactivated => StatusCode::FORBIDDEN,
                ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = self.body();
        if let Some(request_id) = current_request_id() {
            body = body.with_request_id(request_id);
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// `JsonConfig` error handler: malformed bodies get the common error shape.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected request body");
    AppError::BadRequest(format!("Invalid JSON body: {err}")).into()
}

/// `PathConfig` error handler, e.g. for a non-numeric id.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid path parameter: {err}")).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use juicebox_core::error::RepoError;

    #[test]
    fn test_status_follows_error_kind() {
        let cases = [
            (DomainError::PostNotFound(1), StatusCode::NOT_FOUND),
            (DomainError::Forbidden("no"), StatusCode::FORBIDDEN),
            (DomainError::ViewerDeactivated, StatusCode::FORBIDDEN),
            (DomainError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (DomainError::IncorrectCredentials, StatusCode::UNAUTHORIZED),
            (DomainError::UserExists, StatusCode::CONFLICT),
            (DomainError::MissingCredentials, StatusCode::BAD_REQUEST),
            (
                DomainError::Validation("title".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DomainError::CreatePostFailed,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
        assert_eq!(AppError::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_store_errors_do_not_leak_details() {
        let err = AppError::from(DomainError::Store(RepoError::Query(
            "SELECT password_hash FROM users".into(),
        )));

        let body = err.body();

        assert_eq!(body.name, "InternalServerError");
        assert!(!body.message.contains("SELECT"));
    }

    #[test]
    fn test_domain_error_body_uses_wire_name() {
        let body = AppError::from(DomainError::NoPostsMatchTag("#sad".into())).body();

        assert_eq!(body.name, "NoPostsMatchTag");
        assert_eq!(body.message, "No posts match the tag #sad");
    }
}
