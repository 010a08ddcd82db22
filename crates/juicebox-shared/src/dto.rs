//! Data Transfer Objects - request/response types for the API.
//!
//! Missing string fields deserialize as empty so the handlers can report
//! them with the domain's own error (e.g. `MissingCredentials`) instead of a
//! generic body parse failure.

use serde::{Deserialize, Serialize};

/// POST /api/users/login
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/users/register
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub location: String,
}

/// POST /api/posts
///
/// `tags` is a whitespace-separated list such as `"#happy #youcandoanything"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub tags: Option<String>,
}

/// PATCH /api/posts/{id}
///
/// Absent fields are left untouched. A present `tags` string replaces the
/// whole tag set, so `""` removes every tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
}

/// Body returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_tolerates_missing_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"username":"sandra"}"#).unwrap();

        assert_eq!(req.username, "sandra");
        assert!(req.password.is_empty());
    }

    #[test]
    fn test_update_request_distinguishes_absent_and_empty_tags() {
        let absent: UpdatePostRequest = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        let empty: UpdatePostRequest = serde_json::from_str(r#"{"tags":""}"#).unwrap();
        let null: UpdatePostRequest = serde_json::from_str(r#"{"tags":null}"#).unwrap();

        assert_eq!(absent.title.as_deref(), Some("x"));
        assert!(absent.tags.is_none());
        assert_eq!(empty.tags.as_deref(), Some(""));
        assert!(null.tags.is_none());
    }
}
