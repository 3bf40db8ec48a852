//! Render decisions for one integration card.

use serde::Serialize;

use super::integration::{IntegrationCategory, IntegrationId, ProviderForm};
use super::sync_status::DerivedStatus;

/// Local expand/collapse state of a card. Ephemeral; only a click changes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardUiState {
    /// The user expanded the card
    pub open: bool,
}

impl CardUiState {
    /// State after the user expanded the card.
    pub const fn opened() -> Self {
        Self { open: true }
    }

    /// Flip between open and closed.
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }
}

/// The three mutually exclusive ways a card renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CardMode {
    /// Upsell card. The provider form is not mounted.
    Locked {
        /// Where the upgrade link points
        upgrade_route: String,
    },
    /// Connected and open: the full provider form with a collapse toggle.
    Expanded {
        /// Mounted provider form
        form: ProviderForm,
    },
    /// Compact row with a "Connect Now" affordance.
    Collapsed {
        /// Provider form, mounted but possibly hidden
        form: ProviderForm,
        /// The user opened the form
        form_visible: bool,
    },
}

impl CardMode {
    /// Lower-case mode name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Locked { .. } => "locked",
            Self::Expanded { .. } => "expanded",
            Self::Collapsed { .. } => "collapsed",
        }
    }

    /// The provider form, when it is mounted at all.
    pub const fn form(&self) -> Option<&ProviderForm> {
        match self {
            Self::Locked { .. } => None,
            Self::Expanded { form } | Self::Collapsed { form, .. } => Some(form),
        }
    }
}

/// Small tags shown next to the card title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "badge", rename_all = "snake_case")]
pub enum CardBadge {
    /// Connected and syncing
    Active,
    /// Waiting on the first sync or a user selection
    Pending {
        /// What the user still has to do
        hint: String,
    },
    /// Last sync failed
    SyncError {
        /// Backend's explanation, if any
        message: Option<String>,
    },
    /// Plan upgrade required
    Locked,
}

impl CardBadge {
    /// Text on the badge.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Pending { .. } => "Pending!",
            Self::SyncError { .. } => "Sync Error",
            Self::Locked => "Upgrade",
        }
    }
}

/// Everything needed to draw one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    /// Catalog id
    pub id: IntegrationId,
    /// Catalog category
    pub category: IntegrationCategory,
    /// Display name
    pub name: String,
    /// One-line blurb
    pub description: String,
    /// Icon asset name
    pub icon: String,
    /// Help article
    pub kb_link: Option<String>,
    /// Display status from the sync state
    pub status: DerivedStatus,
    /// How the card renders
    pub mode: CardMode,
    /// Tags next to the title
    pub badges: Vec<CardBadge>,
    /// "Last synced ..." line for internal agents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_synced: Option<String>,
}

impl CardView {
    /// Whether any badge matches `predicate`.
    pub fn has_badge(&self, predicate: impl Fn(&CardBadge) -> bool) -> bool {
        self.badges.iter().any(predicate)
    }

    /// Whether the card carries a pending badge.
    pub fn is_pending(&self) -> bool {
        self.has_badge(|badge| matches!(badge, CardBadge::Pending { .. }))
    }

    /// Add a pending badge for a selection the user still has to make.
    #[must_use]
    pub fn with_selection_pending(mut self, hint: Option<&str>) -> Self {
        if let Some(hint) = hint {
            if !self.is_pending() {
                self.badges.push(CardBadge::Pending {
                    hint: hint.to_string(),
                });
            }
        }
        self
    }

    /// Set the last-synced line.
    #[must_use]
    pub fn with_last_synced(mut self, label: Option<String>) -> Self {
        self.last_synced = label;
        self
    }
}

/// Output of the per-card error boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "slot", rename_all = "snake_case")]
pub enum CardSlot {
    /// Rendered card
    Card(CardView),
    /// Rendering failed; a static error tile takes its place
    Fallback {
        /// Integration whose card failed
        id: IntegrationId,
        /// Error tile heading
        title: String,
        /// Error tile body
        subtitle: String,
    },
}

impl CardSlot {
    /// Integration the slot belongs to.
    pub const fn id(&self) -> IntegrationId {
        match self {
            Self::Card(view) => view.id,
            Self::Fallback { id, .. } => *id,
        }
    }

    /// The card, unless the slot fell back.
    pub const fn as_card(&self) -> Option<&CardView> {
        match self {
            Self::Card(view) => Some(view),
            Self::Fallback { .. } => None,
        }
    }
}
