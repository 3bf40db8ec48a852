//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters implement:
//! - SettingsApi: project settings, plan entitlements, sync status and
//!   integration lifecycle calls against the backend
//!
//! Services depend only on these traits, so tests drive them with in-memory
//! fakes and production wires in the HTTP adapter.

pub mod settings_api;

pub use settings_api::{ApiResult, ProjectId, SettingsApi, StatusMap};
