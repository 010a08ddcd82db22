//! # Juicebox API Server
//!
//! HTTP/JSON surface of the blogging backend. The binary in `main.rs` wires
//! these modules together; integration tests build the same app against the
//! in-memory store.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;
