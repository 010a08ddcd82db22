//! Access policy gates composed by the mutation entry points.

use crate::domain::{Post, User, UserId, Viewer};
use crate::error::DomainError;

/// Resources with a single owning user.
pub trait Owned {
    fn owner_id(&self) -> UserId;
}

impl Owned for Post {
    fn owner_id(&self) -> UserId {
        self.author.id
    }
}

impl Owned for User {
    fn owner_id(&self) -> UserId {
        self.id
    }
}

/// Fails with `Unauthenticated` when no viewer was resolved.
pub fn require_viewer(viewer: Option<&Viewer>) -> Result<&Viewer, DomainError> {
    viewer.ok_or(DomainError::Unauthenticated)
}

/// Fails with `ViewerDeactivated` when the viewer's account is inactive.
pub fn require_active_viewer(viewer: &Viewer) -> Result<(), DomainError> {
    if viewer.active {
        Ok(())
    } else {
        Err(DomainError::ViewerDeactivated)
    }
}

/// Fails with `Forbidden(message)` unless the viewer owns `resource`.
pub fn require_owner<R: Owned>(
    resource: &R,
    viewer: &Viewer,
    message: &'static str,
) -> Result<(), DomainError> {
    if resource.owner_id() == viewer.id {
        Ok(())
    } else {
        Err(DomainError::Forbidden(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn viewer(active: bool) -> Viewer {
        Viewer {
            id: 1,
            username: "sandra".to_string(),
            active,
        }
    }

    fn user(id: UserId) -> User {
        User {
            id,
            username: format!("user{id}"),
            password_hash: "hash".to_string(),
            name: "Name".to_string(),
            location: "Place".to_string(),
            active: true,
        }
    }

    #[test]
    fn test_require_viewer_rejects_anonymous() {
        let err = require_viewer(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }

    #[test]
    fn test_require_active_viewer() {
        assert!(require_active_viewer(&viewer(true)).is_ok());
        assert!(matches!(
            require_active_viewer(&viewer(false)),
            Err(DomainError::ViewerDeactivated)
        ));
    }

    #[test]
    fn test_require_owner() {
        let v = viewer(true);
        assert!(require_owner(&user(1), &v, "nope").is_ok());

        let err = require_owner(&user(2), &v, "nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.to_string(), "nope");
    }
}
