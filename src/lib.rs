//! Integration settings for a marketing-analytics workspace
//!
//! Resolves, for every third-party integration a project can use, whether the
//! plan unlocks it, whether it is connected, how healthy its sync is, and which
//! card the settings page should render. Connect/disconnect operations and the
//! OAuth redirect round-trip live here as well.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and the backend port
//! - **Service Layer** (`services`): catalog, lock resolution, status, card
//!   rendering and mutations
//! - **Infrastructure Layer** (`infrastructure`): config, logging and the HTTP
//!   adapter
//! - **CLI Layer** (`cli`): command-line interface

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{ApiError, DomainError};
pub use domain::models::{
    CardSlot, CardView, Config, DerivedStatus, IntegrationCategory, IntegrationId,
    IntegrationStatus, PlanEntitlements, ProjectSettings,
};
pub use domain::ports::SettingsApi;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{IntegrationRegistry, SettingsPage};
