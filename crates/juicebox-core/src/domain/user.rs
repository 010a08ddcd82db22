use serde::{Deserialize, Serialize};

pub type UserId = i32;

/// User entity - a registered account.
///
/// Holds the password hash, so it is deliberately not `Serialize`; every
/// outward representation goes through [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub location: String,
    pub active: bool,
}

impl User {
    /// Public projection of this user.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            active: self.active,
        }
    }
}

/// Public view of a user, used for listings and as a post's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub name: String,
    pub location: String,
    pub active: bool,
}

/// Fields required to register a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub location: String,
}

/// Partial update of a user. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub location: Option<String>,
    pub active: Option<bool>,
}

impl UserChanges {
    pub fn activation(active: bool) -> Self {
        Self {
            active: Some(active),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none() && self.active.is_none()
    }
}

/// The identity associated with the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: UserId,
    pub username: String,
    pub active: bool,
}

impl From<&User> for Viewer {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            active: user.active,
        }
    }
}
