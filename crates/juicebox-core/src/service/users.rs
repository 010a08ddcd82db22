//! User operations: registration, login, listing and (re)activation.

use crate::domain::{NewUser, Post, User, UserChanges, UserId, UserProfile, Viewer};
use crate::error::DomainError;
use crate::policy::{require_active_viewer, require_owner, require_viewer};
use crate::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use crate::visibility::retain_visible;

use super::require_text;

/// Registration form with the plain text password.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub name: String,
    pub location: String,
}

/// A user together with a freshly issued token.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub token: String,
}

#[tracing::instrument(skip_all, fields(username = %form.username))]
pub async fn register(
    users: &dyn UserRepository,
    passwords: &dyn PasswordService,
    tokens: &dyn TokenService,
    form: Registration,
) -> Result<SignedIn, DomainError> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Err(DomainError::MissingCredentials);
    }
    require_text("name", &form.name)?;
    require_text("location", &form.location)?;

    if users.find_by_username(username).await?.is_some() {
        return Err(DomainError::UserExists);
    }

    let password_hash = passwords.hash(&form.password)?;
    let user = users
        .create(NewUser {
            username: username.to_string(),
            password_hash,
            name: form.name,
            location: form.location,
        })
        .await?
        // Lost a race against a concurrent registration.
        .ok_or(DomainError::UserExists)?;

    let token = tokens.generate_token(user.id, &user.username)?;
    tracing::info!(user_id = user.id, "User registered");
    Ok(SignedIn { user, token })
}

#[tracing::instrument(skip_all, fields(username = %username))]
pub async fn login(
    users: &dyn UserRepository,
    passwords: &dyn PasswordService,
    tokens: &dyn TokenService,
    username: &str,
    password: &str,
) -> Result<SignedIn, DomainError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(DomainError::MissingCredentials);
    }

    let user = users
        .find_by_username(username)
        .await?
        .ok_or(DomainError::IncorrectCredentials)?;

    if !passwords.verify(password, &user.password_hash)? {
        return Err(DomainError::IncorrectCredentials);
    }

    let token = tokens.generate_token(user.id, &user.username)?;
    Ok(SignedIn { user, token })
}

pub async fn list_users(users: &dyn UserRepository) -> Result<Vec<UserProfile>, DomainError> {
    Ok(users.list().await?)
}

/// A user's public profile and the posts of theirs the viewer may see.
pub async fn user_detail(
    users: &dyn UserRepository,
    posts: &dyn PostRepository,
    viewer: Option<&Viewer>,
    id: UserId,
) -> Result<(UserProfile, Vec<Post>), DomainError> {
    let user = users.find_by_id(id).await?.ok_or(DomainError::UserNotFound(id))?;
    let authored = retain_visible(posts.list_by_author(id).await?, viewer);
    Ok((user.profile(), authored))
}

#[tracing::instrument(skip(users, viewer), fields(viewer_id = viewer.map(|v| v.id)))]
pub async fn deactivate_user(
    users: &dyn UserRepository,
    viewer: Option<&Viewer>,
    id: UserId,
) -> Result<UserProfile, DomainError> {
    let viewer = require_viewer(viewer)?;
    require_active_viewer(viewer)?;

    let user = users.find_by_id(id).await?.ok_or(DomainError::UserNotFound(id))?;
    require_owner(&user, viewer, "Only the user can deactivate their own account")?;
    if !user.active {
        return Err(DomainError::AlreadyDeactivated);
    }

    set_active(users, id, false).await
}

/// Deactivated users may reactivate themselves, so only a viewer is required.
#[tracing::instrument(skip(users, viewer), fields(viewer_id = viewer.map(|v| v.id)))]
pub async fn reactivate_user(
    users: &dyn UserRepository,
    viewer: Option<&Viewer>,
    id: UserId,
) -> Result<UserProfile, DomainError> {
    let viewer = require_viewer(viewer)?;

    let user = users.find_by_id(id).await?.ok_or(DomainError::UserNotFound(id))?;
    require_owner(&user, viewer, "Only the user can reactivate their own account")?;
    if user.active {
        return Err(DomainError::AlreadyActive);
    }

    set_active(users, id, true).await
}

async fn set_active(
    users: &dyn UserRepository,
    id: UserId,
    active: bool,
) -> Result<UserProfile, DomainError> {
    let updated = users
        .update(id, UserChanges::activation(active))
        .await?
        .ok_or(DomainError::UserNotFound(id))?;
    tracing::info!(user_id = id, active, "User activation changed");
    Ok(updated.profile())
}
