//! Domain models
//!
//! Catalog entries, plan entitlements, settings, sync status and the card
//! views rendered from them.

pub mod callback;
pub mod card;
pub mod config;
pub mod entitlement;
pub mod integration;
pub mod project_settings;
pub mod sync_status;

pub use callback::{CallbackOutcome, InboundCallback};
pub use card::{CardBadge, CardMode, CardSlot, CardUiState, CardView};
pub use config::{
    AccessConfig, ApiConfig, Config, DashboardConfig, LoggingConfig, OAuthConfig,
};
pub use entitlement::{FeatureEntitlement, FeatureLockState, PlanEntitlements};
pub use integration::{
    CredentialField, Feature, Instructions, IntegrationCategory, IntegrationDescriptor,
    IntegrationId, OAuthFlow, ProviderForm,
};
pub use project_settings::{Connection, ProjectSettings, SettingsError, SettingsPatch};
pub use sync_status::{derive_status, DerivedStatus, IntegrationState, IntegrationStatus};
