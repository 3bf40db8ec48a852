//! Card render decisions.
//!
//! [`render_card`] is a pure function of one catalog entry, its lock state and
//! its sync status. [`render_slot`] adds the per-card error boundary: a card
//! whose settings cannot be read becomes a fallback slot instead of failing
//! the page.

use chrono::{DateTime, Utc};
use tracing::{debug, error};

use crate::domain::models::{
    CardBadge, CardMode, CardSlot, CardUiState, CardView, DerivedStatus, FeatureLockState,
    IntegrationDescriptor, IntegrationStatus, ProjectSettings, SettingsError,
};
use crate::services::feature_lock::FeatureLockResolver;
use crate::services::status::{last_synced_label, AgentAccess, StatusSnapshot};

/// Heading of the error tile.
pub const FALLBACK_TITLE: &str = "Bundle Error:02";
/// Body of the error tile.
pub const FALLBACK_SUBTITLE: &str =
    "We are facing trouble loading App Bundles. Drop us a message on the in-app chat.";

const DEFAULT_PENDING_HINT: &str = "Sync pending";

/// Decide how one card renders.
pub fn render_card(
    descriptor: &IntegrationDescriptor,
    lock: &FeatureLockState,
    status: &IntegrationStatus,
    ui: CardUiState,
    default_open: bool,
    upgrade_route: &str,
) -> CardView {
    let derived = status.derived();
    let connected = lock.is_feature_connected || derived == DerivedStatus::Connected;

    let mode = if lock.blocks_access() {
        CardMode::Locked {
            upgrade_route: upgrade_route.to_string(),
        }
    } else if connected && (ui.open || default_open) {
        CardMode::Expanded {
            form: descriptor.form(),
        }
    } else {
        CardMode::Collapsed {
            form: descriptor.form(),
            form_visible: ui.open,
        }
    };

    let mut badges = Vec::new();
    match &mode {
        CardMode::Locked { .. } => badges.push(CardBadge::Locked),
        CardMode::Expanded { .. } | CardMode::Collapsed { .. } if connected => {
            badges.push(CardBadge::Active);
        }
        CardMode::Expanded { .. } | CardMode::Collapsed { .. } => {}
    }
    match derived {
        DerivedStatus::Pending => badges.push(CardBadge::Pending {
            hint: status
                .message
                .clone()
                .unwrap_or_else(|| DEFAULT_PENDING_HINT.to_string()),
        }),
        DerivedStatus::Error => badges.push(CardBadge::SyncError {
            message: status.message.clone(),
        }),
        DerivedStatus::Connected | DerivedStatus::NotConnected => {}
    }

    debug!(
        integration = %descriptor.id,
        mode = mode.name(),
        status = %derived,
        "Rendered integration card"
    );

    CardView {
        id: descriptor.id,
        category: descriptor.category,
        name: descriptor.name.to_string(),
        description: descriptor.description.to_string(),
        icon: descriptor.icon.to_string(),
        kb_link: descriptor.kb_link.map(ToString::to_string),
        status: derived,
        mode,
        badges,
        last_synced: None,
    }
}

/// Page-level inputs shared by every card.
#[derive(Debug, Clone, Copy)]
pub struct CardContext<'a> {
    /// Plan lock state
    pub resolver: &'a FeatureLockResolver,
    /// Loaded project settings
    pub settings: &'a ProjectSettings,
    /// Sync status
    pub status: &'a StatusSnapshot,
    /// Target of the upgrade link on locked cards
    pub upgrade_route: &'a str,
    /// Viewer's email, for the last-synced line
    pub agent_email: Option<&'a str>,
    /// Internal agent allow-list
    pub access: &'a AgentAccess,
    /// Clock for relative times
    pub now: DateTime<Utc>,
}

/// Render one card inside its error boundary.
pub fn render_slot(
    descriptor: &IntegrationDescriptor,
    context: &CardContext<'_>,
    ui: CardUiState,
    default_open: bool,
) -> CardSlot {
    match try_render(descriptor, context, ui, default_open) {
        Ok(view) => CardSlot::Card(view),
        Err(err) => {
            error!(integration = %descriptor.id, error = %err, "Integration card failed to render");
            CardSlot::Fallback {
                id: descriptor.id,
                title: FALLBACK_TITLE.to_string(),
                subtitle: FALLBACK_SUBTITLE.to_string(),
            }
        }
    }
}

fn try_render(
    descriptor: &IntegrationDescriptor,
    context: &CardContext<'_>,
    ui: CardUiState,
    default_open: bool,
) -> Result<CardView, SettingsError> {
    let connection = context.settings.connection(descriptor.id)?;
    let lock = context.resolver.resolve_descriptor(descriptor, context.settings)?;
    let status = context.status.get(descriptor.status_key());

    let label = last_synced_label(
        &status,
        connection.connected,
        context.agent_email,
        context.access,
        context.now,
    );

    let view = render_card(descriptor, &lock, &status, ui, default_open, context.upgrade_route);
    let selection_pending = match view.mode {
        CardMode::Locked { .. } => None,
        CardMode::Expanded { .. } | CardMode::Collapsed { .. } => connection.selection_pending,
    };
    Ok(view
        .with_selection_pending(selection_pending)
        .with_last_synced(label))
}
