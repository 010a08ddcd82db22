//! Error body returned by every failing endpoint.

use serde::{Deserialize, Serialize};

/// `{ "name": ..., "message": ... }`, the shape clients match on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error name, e.g. `UserExists` or `PostNotFound`.
    pub name: String,

    /// Human-readable explanation.
    pub message: String,

    /// Request ID for debugging purposes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error() -> Self {
        Self::new("InternalServerError", "Something went wrong")
    }
}
