//! Backend-reported sync state and the display status derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sync pipeline state as reported by the backend.
///
/// Values the backend adds later land in `Other` instead of failing the whole
/// status payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IntegrationState {
    /// `synced`
    Synced,
    /// `delayed`
    Delayed,
    /// `pull_delayed`
    PullDelayed,
    /// `sync_pending`
    SyncPending,
    /// `heavy_delayed`
    HeavyDelayed,
    /// `client_token_expired`
    ClientTokenExpired,
    /// `limit_exceed`
    LimitExceed,
    /// Empty state: the pipeline has never reported
    #[default]
    NotSynced,
    /// Any state this build does not know
    Other(String),
}

impl IntegrationState {
    /// Wire value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Synced => "synced",
            Self::Delayed => "delayed",
            Self::PullDelayed => "pull_delayed",
            Self::SyncPending => "sync_pending",
            Self::HeavyDelayed => "heavy_delayed",
            Self::ClientTokenExpired => "client_token_expired",
            Self::LimitExceed => "limit_exceed",
            Self::NotSynced => "",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for IntegrationState {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "synced" => Self::Synced,
            "delayed" => Self::Delayed,
            "pull_delayed" => Self::PullDelayed,
            "sync_pending" => Self::SyncPending,
            "heavy_delayed" => Self::HeavyDelayed,
            "client_token_expired" => Self::ClientTokenExpired,
            "limit_exceed" => Self::LimitExceed,
            "" => Self::NotSynced,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for IntegrationState {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<IntegrationState> for String {
    fn from(state: IntegrationState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for IntegrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-integration sync status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationStatus {
    /// Pipeline state
    #[serde(default)]
    pub state: IntegrationState,

    /// Unix timestamp (seconds) of the last successful sync, 0 if never
    #[serde(default)]
    pub last_synced_at: i64,

    /// Backend's explanation of an error state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IntegrationStatus {
    /// Status with no message.
    pub fn new(state: impl Into<IntegrationState>, last_synced_at: i64) -> Self {
        Self {
            state: state.into(),
            last_synced_at,
            message: None,
        }
    }

    /// Display status for this state.
    pub fn derived(&self) -> DerivedStatus {
        derive_status(&self.state)
    }
}

/// Display-only status. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedStatus {
    /// Syncing normally
    Connected,
    /// Sync is failing
    Error,
    /// Sync has not caught up
    Pending,
    /// No sync reported
    NotConnected,
}

impl DerivedStatus {
    /// Lower-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Error => "error",
            Self::Pending => "pending",
            Self::NotConnected => "not_connected",
        }
    }
}

impl fmt::Display for DerivedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a sync state to its display status. Total over every state.
pub fn derive_status(state: &IntegrationState) -> DerivedStatus {
    match state {
        IntegrationState::Synced => DerivedStatus::Connected,
        IntegrationState::SyncPending
        | IntegrationState::Delayed
        | IntegrationState::PullDelayed => DerivedStatus::Pending,
        IntegrationState::HeavyDelayed
        | IntegrationState::ClientTokenExpired
        | IntegrationState::LimitExceed => DerivedStatus::Error,
        IntegrationState::NotSynced | IntegrationState::Other(_) => DerivedStatus::NotConnected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_states_parse() {
        assert_eq!(IntegrationState::from("synced"), IntegrationState::Synced);
        assert_eq!(IntegrationState::from("pull_delayed"), IntegrationState::PullDelayed);
        assert_eq!(IntegrationState::from(""), IntegrationState::NotSynced);
        assert_eq!(
            IntegrationState::from("paused"),
            IntegrationState::Other("paused".to_string())
        );
    }

    #[test]
    fn test_derive_status_table() {
        let cases = [
            ("synced", DerivedStatus::Connected),
            ("delayed", DerivedStatus::Pending),
            ("pull_delayed", DerivedStatus::Pending),
            ("sync_pending", DerivedStatus::Pending),
            ("heavy_delayed", DerivedStatus::Error),
            ("client_token_expired", DerivedStatus::Error),
            ("limit_exceed", DerivedStatus::Error),
            ("", DerivedStatus::NotConnected),
            ("something_new", DerivedStatus::NotConnected),
        ];
        for (raw, expected) in cases {
            assert_eq!(derive_status(&IntegrationState::from(raw)), expected, "state {raw:?}");
        }
    }

    #[test]
    fn test_status_deserializes_with_missing_fields() {
        let status: IntegrationStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(status.state, IntegrationState::NotSynced);
        assert_eq!(status.last_synced_at, 0);
        assert_eq!(status.derived(), DerivedStatus::NotConnected);

        let status: IntegrationStatus =
            serde_json::from_str(r#"{"state":"client_token_expired","last_synced_at":1700000000,"message":"re-auth"}"#)
                .unwrap();
        assert_eq!(status.state, IntegrationState::ClientTokenExpired);
        assert_eq!(status.message.as_deref(), Some("re-auth"));
    }
}
