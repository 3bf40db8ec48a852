//! Application services
//!
//! Everything that turns catalog data, plan entitlements and backend status
//! into what the settings page shows, plus the connect/disconnect operations.

pub mod callback;
pub mod card;
pub mod dashboards;
pub mod feature_lock;
pub mod filter;
pub mod mutations;
pub mod registry;
pub mod settings_page;
pub mod single_flight;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use callback::{direct_consent_url, parse_inbound_callback};
pub use card::{render_card, render_slot, CardContext};
pub use dashboards::DashboardTemplateScheduler;
pub use feature_lock::{EntitlementState, FeatureLockResolver};
pub use filter::{filter_integrations, CategorySelection};
pub use mutations::{CredentialForm, FormValues, IntegrationMutations, MutationError, Notification};
pub use registry::IntegrationRegistry;
pub use settings_page::{PageView, SettingsPage, SettingsState, SettingsStore, Viewer};
pub use single_flight::SingleFlight;
pub use status::{last_synced_label, AgentAccess, StatusContext, StatusSnapshot};
