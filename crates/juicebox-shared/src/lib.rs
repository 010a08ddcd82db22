//! # Juicebox Shared
//!
//! Request and response bodies of the HTTP API. Kept free of server
//! dependencies so clients can reuse them.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
