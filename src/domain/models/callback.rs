//! Typed result of an inbound OAuth redirect.

use serde::Serialize;

use super::integration::IntegrationId;

/// Whether the provider round trip worked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackOutcome {
    /// Consent granted
    Success,
    /// Provider or backend reported a failure
    Error,
}

/// What the provider (or the backend on its behalf) told us on the way back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboundCallback {
    /// Success or error
    pub outcome: CallbackOutcome,
    /// Provider the redirect belongs to, when known
    pub provider: Option<IntegrationId>,
    /// User-facing message for the toast
    pub message: Option<String>,
    /// Authorization code for direct-consent providers
    #[serde(skip_serializing)]
    pub code: Option<String>,
    /// Open the provider's card on arrival
    pub default_open: bool,
}

impl InboundCallback {
    /// Whether an error toast is due.
    pub const fn is_error(&self) -> bool {
        matches!(self.outcome, CallbackOutcome::Error)
    }

    /// Whether the card for `id` should start expanded.
    pub fn opens(&self, id: IntegrationId) -> bool {
        self.default_open && self.provider.is_none_or(|provider| provider == id)
    }
}
