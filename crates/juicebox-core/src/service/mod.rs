//! Request-level operations: access policy, then store, then visibility.

pub mod posts;
pub mod users;

pub use posts::PostDraft;
pub use users::Registration;

use crate::error::DomainError;

fn require_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        Err(DomainError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}
