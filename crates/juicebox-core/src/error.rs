//! Domain-level error types.

use thiserror::Error;

use crate::domain::{PostId, UserId};
use crate::ports::AuthError;

/// Broad classification of a failure, independent of transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Unauthenticated,
    ViewerDeactivated,
    Conflict,
    Validation,
    Internal,
}

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Could not find a post with id {0}")]
    PostNotFound(PostId),

    #[error("The user with id {0} does not exist")]
    UserNotFound(UserId),

    #[error("No posts match the tag {0}")]
    NoPostsMatchTag(String),

    #[error("You must be logged in to perform this action")]
    Unauthenticated,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Current user has previously been deactivated")]
    ViewerDeactivated,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("A user by that username already exists")]
    UserExists,

    #[error("This user has already been deactivated")]
    AlreadyDeactivated,

    #[error("This user is not currently deactivated")]
    AlreadyActive,

    #[error("Please supply both a username and password")]
    MissingCredentials,

    #[error("Username or password is incorrect")]
    IncorrectCredentials,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("There was an error creating a new post")]
    CreatePostFailed,

    #[error(transparent)]
    Store(#[from] RepoError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PostNotFound(_) | Self::UserNotFound(_) | Self::NoPostsMatchTag(_) => {
                ErrorKind::NotFound
            }
            Self::Unauthenticated | Self::InvalidToken(_) | Self::IncorrectCredentials => {
                ErrorKind::Unauthenticated
            }
            Self::ViewerDeactivated => ErrorKind::ViewerDeactivated,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::UserExists | Self::AlreadyDeactivated | Self::AlreadyActive => {
                ErrorKind::Conflict
            }
            Self::MissingCredentials | Self::Validation(_) => ErrorKind::Validation,
            Self::CreatePostFailed | Self::Store(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Stable name reported to clients.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PostNotFound(_) => "PostNotFound",
            Self::UserNotFound(_) => "UserNotFound",
            Self::NoPostsMatchTag(_) => "NoPostsMatchTag",
            Self::Unauthenticated => "Unauthenticated",
            Self::InvalidToken(_) => "InvalidToken",
            Self::ViewerDeactivated => "ViewerDeactivated",
            Self::Forbidden(_) => "Forbidden",
            Self::UserExists => "UserExists",
            Self::AlreadyDeactivated => "AlreadyDeactivated",
            Self::AlreadyActive => "AlreadyActive",
            Self::MissingCredentials => "MissingCredentials",
            Self::IncorrectCredentials => "IncorrectCredentials",
            Self::Validation(_) => "ValidationError",
            Self::CreatePostFailed => "CreatePostFailed",
            Self::Store(_) | Self::Internal(_) => "InternalServerError",
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::IncorrectCredentials,
            AuthError::TokenExpired => Self::InvalidToken("token expired".to_string()),
            AuthError::InvalidToken(msg) => Self::InvalidToken(msg),
            AuthError::MissingAuth => Self::Unauthenticated,
            AuthError::HashingError(msg) => Self::Internal(msg),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
