//! # Juicebox Core
//!
//! The domain layer of the Juicebox blogging backend.
//! Pure business rules (who may see a post, who may change it, how a post's
//! tag set is reconciled) with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod mutation;
pub mod policy;
pub mod ports;
pub mod service;
pub mod visibility;

pub use error::{DomainError, ErrorKind};
