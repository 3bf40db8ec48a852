//! Domain layer
//!
//! Integration identities, plan entitlements, sync status and card render
//! decisions. Nothing in here performs I/O.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ApiError, DomainError, DomainResult, FieldError};
