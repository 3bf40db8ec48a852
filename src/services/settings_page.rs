//! One visit to the integrations settings page.
//!
//! Mounting fetches project settings, plan entitlements and sync status
//! concurrently, one request each, and parses the route URL for an OAuth
//! callback exactly once. Cards are rendered on demand from that state.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

use crate::domain::errors::ApiError;
use crate::domain::models::{
    CardSlot, CardUiState, Config, InboundCallback, IntegrationId, ProjectSettings,
};
use crate::domain::ports::{ProjectId, SettingsApi};
use crate::services::callback::parse_inbound_callback;
use crate::services::card::{render_slot, CardContext};
use crate::services::dashboards::DashboardTemplateScheduler;
use crate::services::feature_lock::FeatureLockResolver;
use crate::services::filter::{filter_integrations, CategorySelection};
use crate::services::mutations::{IntegrationMutations, Notification};
use crate::services::registry::IntegrationRegistry;
use crate::services::status::{AgentAccess, StatusContext};

/// Last known project settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SettingsState {
    /// First fetch not settled
    #[default]
    Loading,
    /// Settings available
    Ready(ProjectSettings),
    /// First fetch failed; carries the toast text
    Failed(String),
}

#[derive(Debug, Default)]
struct SettingsCell {
    state: SettingsState,
    applied: u64,
}

/// Project settings shared between the page and its mutations.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    api: Arc<dyn SettingsApi>,
    project_id: ProjectId,
    issued: Arc<AtomicU64>,
    cell: Arc<RwLock<SettingsCell>>,
}

impl SettingsStore {
    /// Store that has not fetched yet.
    pub fn new(api: Arc<dyn SettingsApi>, project_id: ProjectId) -> Self {
        Self {
            api,
            project_id,
            issued: Arc::new(AtomicU64::new(0)),
            cell: Arc::new(RwLock::new(SettingsCell::default())),
        }
    }

    /// Fetch once. A failure keeps previously loaded settings, and a response
    /// is dropped if a later refetch has already written.
    pub async fn refetch(&self) -> Result<(), ApiError> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.fetch_project_settings(self.project_id).await;
        self.store(ticket, result).await
    }

    async fn store(
        &self,
        ticket: u64,
        result: Result<ProjectSettings, ApiError>,
    ) -> Result<(), ApiError> {
        let mut cell = self.cell.write().await;
        match result {
            Ok(settings) => {
                if ticket < cell.applied {
                    debug!(project_id = self.project_id, ticket, "Dropping superseded settings response");
                } else {
                    cell.applied = ticket;
                    cell.state = SettingsState::Ready(settings);
                }
                Ok(())
            }
            Err(err) => {
                error!(project_id = self.project_id, error = %err, "Failed to fetch project settings");
                if !matches!(cell.state, SettingsState::Ready(_)) {
                    cell.state = SettingsState::Failed(err.user_message());
                }
                Err(err)
            }
        }
    }

    /// Copy of the last known state.
    pub async fn current(&self) -> SettingsState {
        self.cell.read().await.state.clone()
    }
}

/// What the page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageView {
    /// Settings have not arrived yet
    Loading,
    /// Settings could not be loaded at all
    Unavailable {
        /// Toast text for the failure
        message: String,
    },
    /// Cards in display order
    Ready {
        /// One slot per visible integration
        cards: Vec<CardSlot>,
    },
}

impl PageView {
    /// Rendered cards; empty unless ready.
    pub fn cards(&self) -> &[CardSlot] {
        match self {
            Self::Ready { cards } => cards,
            Self::Loading | Self::Unavailable { .. } => &[],
        }
    }
}

/// The agent viewing the page.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    /// Signed-in agent's email
    pub email: Option<String>,
    /// Who counts as an internal agent
    pub access: AgentAccess,
}

impl Viewer {
    /// Whether the viewer is on the internal allow-list.
    pub fn is_internal(&self) -> bool {
        self.email
            .as_deref()
            .is_some_and(|email| self.access.allows(email))
    }
}

/// State for one settings-page visit.
#[derive(Debug)]
pub struct SettingsPage {
    project_id: ProjectId,
    registry: IntegrationRegistry,
    settings: SettingsStore,
    status: StatusContext,
    resolver: Arc<FeatureLockResolver>,
    mutations: IntegrationMutations,
    callback: Option<InboundCallback>,
    viewer: Viewer,
    pricing_route: String,
}

impl SettingsPage {
    /// Fetch everything the page needs and parse the entry URL.
    #[instrument(skip(api, viewer, config, callback_url))]
    pub async fn mount(
        api: Arc<dyn SettingsApi>,
        project_id: ProjectId,
        viewer: Viewer,
        config: &Config,
        callback_url: Option<&str>,
    ) -> Self {
        let callback = callback_url.and_then(|url| parse_inbound_callback(url, &config.oauth));

        let settings = SettingsStore::new(Arc::clone(&api), project_id);
        let status = StatusContext::new(Arc::clone(&api), project_id);
        let (_settings, plan_result, ()) = tokio::join!(
            settings.refetch(),
            api.fetch_plan_entitlements(project_id),
            status.refetch(),
        );

        let mut resolver = FeatureLockResolver::new();
        resolver.load(plan_result);
        let resolver = Arc::new(resolver);

        let dashboards = Arc::new(DashboardTemplateScheduler::new(
            Arc::clone(&api),
            &config.dashboards,
        ));
        let registry = IntegrationRegistry::builtin();
        let mutations = IntegrationMutations::new(
            api,
            registry.clone(),
            Arc::clone(&resolver),
            settings.clone(),
            status.clone(),
            dashboards,
            config.oauth.clone(),
        );

        info!(project_id, callback = callback.is_some(), "Integration settings page mounted");
        Self {
            project_id,
            registry,
            settings,
            status,
            resolver,
            mutations,
            callback,
            viewer,
            pricing_route: config.pricing_route.clone(),
        }
    }

    /// Project being viewed.
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Catalog backing the cards.
    pub const fn registry(&self) -> &IntegrationRegistry {
        &self.registry
    }

    /// Plan lock state loaded at mount.
    pub fn lock_resolver(&self) -> &FeatureLockResolver {
        &self.resolver
    }

    /// Shared status context.
    pub const fn status_context(&self) -> &StatusContext {
        &self.status
    }

    /// Connect and disconnect operations for this visit.
    pub const fn mutations(&self) -> &IntegrationMutations {
        &self.mutations
    }

    /// Callback parsed from the entry URL, if any.
    pub const fn callback(&self) -> Option<&InboundCallback> {
        self.callback.as_ref()
    }

    /// Error toast for a failed OAuth callback.
    pub fn callback_notification(&self) -> Option<Notification> {
        self.callback
            .as_ref()
            .filter(|callback| callback.is_error())
            .and_then(|callback| callback.message.clone())
            .map(Notification::Error)
    }

    /// Render the filtered cards. Internal integrations are hidden from
    /// agents outside the allow-list.
    pub async fn cards(
        &self,
        selection: CategorySelection,
        query: &str,
        ui_states: &HashMap<IntegrationId, CardUiState>,
    ) -> PageView {
        let settings = match self.settings.current().await {
            SettingsState::Loading => return PageView::Loading,
            SettingsState::Failed(message) => return PageView::Unavailable { message },
            SettingsState::Ready(settings) => settings,
        };
        let status = self.status.snapshot().await;

        let context = CardContext {
            resolver: self.resolver.as_ref(),
            settings: &settings,
            status: &status,
            upgrade_route: &self.pricing_route,
            agent_email: self.viewer.email.as_deref(),
            access: &self.viewer.access,
            now: Utc::now(),
        };
        let internal = self.viewer.is_internal();

        let cards = filter_integrations(self.registry.all(), selection, query)
            .into_iter()
            .filter(|descriptor| internal || !descriptor.internal_only)
            .map(|descriptor| {
                let ui = ui_states.get(&descriptor.id).copied().unwrap_or_default();
                let default_open = self
                    .callback
                    .as_ref()
                    .is_some_and(|callback| callback.opens(descriptor.id));
                render_slot(descriptor, &context, ui, default_open)
            })
            .collect();

        PageView::Ready { cards }
    }

    /// Manual refresh of settings and status.
    pub async fn refresh(&self) {
        let (_settings, ()) = tokio::join!(self.settings.refetch(), self.status.refetch());
    }
}
