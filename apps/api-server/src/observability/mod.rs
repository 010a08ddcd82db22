//! Observability module - request IDs.

mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestIdMiddleware, current_request_id};
