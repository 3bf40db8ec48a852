//! Integration sync status for one settings-page visit.
//!
//! [`StatusContext`] is the narrow shared context the page hands to every
//! card: a read-only snapshot plus an explicit `refetch`. Fetch failures are
//! logged and leave an empty map, so every integration reads as not connected
//! and the rest of the page keeps rendering. When refetches overlap, only the
//! most recently issued one may write.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::domain::models::{AccessConfig, IntegrationStatus};
use crate::domain::ports::{ProjectId, SettingsApi, StatusMap};

/// Read-only view of the status map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Status per feature name
    pub status: StatusMap,
    /// A fetch is outstanding
    pub loading: bool,
}

impl StatusSnapshot {
    /// Status for a feature name; a missing entry reads as never synced.
    pub fn get(&self, feature_name: &str) -> IntegrationStatus {
        self.status.get(feature_name).cloned().unwrap_or_default()
    }
}

#[derive(Debug)]
struct StatusCell {
    snapshot: StatusSnapshot,
    applied: u64,
}

/// Shared status context exposing `{status, loading, refetch}`.
#[derive(Clone)]
pub struct StatusContext {
    api: Arc<dyn SettingsApi>,
    project_id: ProjectId,
    issued: Arc<AtomicU64>,
    cell: Arc<RwLock<StatusCell>>,
}

impl std::fmt::Debug for StatusContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusContext")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl StatusContext {
    /// Context that has not fetched yet; `loading()` is true.
    pub fn new(api: Arc<dyn SettingsApi>, project_id: ProjectId) -> Self {
        Self {
            api,
            project_id,
            issued: Arc::new(AtomicU64::new(0)),
            cell: Arc::new(RwLock::new(StatusCell {
                snapshot: StatusSnapshot {
                    status: StatusMap::new(),
                    loading: true,
                },
                applied: 0,
            })),
        }
    }

    /// Create the context and perform the single mount-time fetch.
    pub async fn mount(api: Arc<dyn SettingsApi>, project_id: ProjectId) -> Self {
        let context = Self::new(api, project_id);
        context.refetch().await;
        context
    }

    /// Fetch once and replace the map. Errors are logged, never returned.
    ///
    /// A response is dropped if a later refetch has already written.
    pub async fn refetch(&self) {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.cell.write().await.snapshot.loading = true;

        let status = match self.api.fetch_integration_status(self.project_id).await {
            Ok(status) => {
                info!(
                    project_id = self.project_id,
                    integrations = status.len(),
                    "Fetched integration status"
                );
                status
            }
            Err(err) => {
                error!(
                    project_id = self.project_id,
                    error = %err,
                    "Failed to fetch integration status"
                );
                StatusMap::new()
            }
        };

        let mut cell = self.cell.write().await;
        if ticket < cell.applied {
            debug!(project_id = self.project_id, ticket, "Dropping superseded status response");
            return;
        }
        cell.applied = ticket;
        cell.snapshot.status = status;
        cell.snapshot.loading = ticket < self.issued.load(Ordering::SeqCst);
    }

    /// Copy of the current map and loading flag.
    pub async fn snapshot(&self) -> StatusSnapshot {
        self.cell.read().await.snapshot.clone()
    }

    /// Raw status for one feature, if the backend reported it.
    pub async fn status(&self, feature_name: &str) -> Option<IntegrationStatus> {
        self.cell.read().await.snapshot.status.get(feature_name).cloned()
    }

    /// Whether a fetch is outstanding.
    pub async fn loading(&self) -> bool {
        self.cell.read().await.snapshot.loading
    }

    /// Project the context fetches for.
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

/// Allow-list of agents who may see internal integrations and sync diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentAccess {
    emails: Vec<String>,
    domains: Vec<String>,
}

impl AgentAccess {
    /// Allow-list from exact emails and email domains, both case-insensitive.
    pub fn new<E, D>(emails: E, domains: D) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|email| email.as_ref().trim().to_lowercase())
                .filter(|email| !email.is_empty())
                .collect(),
            domains: domains
                .into_iter()
                .map(|domain| domain.as_ref().trim().trim_start_matches('@').to_lowercase())
                .filter(|domain| !domain.is_empty())
                .collect(),
        }
    }

    /// Allow-list from the `access` config section.
    pub fn from_config(config: &AccessConfig) -> Self {
        Self::new(&config.internal_emails, &config.internal_domains)
    }

    /// Exact email or email-domain match, case-insensitive.
    pub fn allows(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return false;
        }
        if self.emails.iter().any(|allowed| *allowed == email) {
            return true;
        }
        email
            .rsplit_once('@')
            .is_some_and(|(_, domain)| self.domains.iter().any(|allowed| allowed == domain))
    }
}

/// "Last synced ..." label, shown only to allow-listed agents for integrated providers.
pub fn last_synced_label(
    status: &IntegrationStatus,
    integrated: bool,
    agent_email: Option<&str>,
    access: &AgentAccess,
    now: DateTime<Utc>,
) -> Option<String> {
    if !integrated || status.last_synced_at <= 0 {
        return None;
    }
    if !agent_email.is_some_and(|email| access.allows(email)) {
        debug!("Sync diagnostics hidden for agent outside the allow-list");
        return None;
    }

    let elapsed = (now.timestamp() - status.last_synced_at).max(0);
    Some(format!("Last synced {} ago", humanize_seconds(elapsed)))
}

fn humanize_seconds(seconds: i64) -> String {
    const UNITS: [(i64, &str); 4] = [(86_400, "day"), (3_600, "hour"), (60, "minute"), (1, "second")];

    let (amount, unit) = UNITS
        .iter()
        .find(|(size, _)| seconds >= *size)
        .map_or((0, "second"), |(size, unit)| (seconds / size, *unit));

    if amount == 1 {
        format!("1 {unit}")
    } else {
        format!("{amount} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::FakeSettingsApi;
    use chrono::TimeZone;
    use std::time::Duration;

    fn status_map(feature: &str, state: &str) -> StatusMap {
        let mut status = StatusMap::new();
        status.insert(feature.to_string(), IntegrationStatus::new(state, 0));
        status
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn access() -> AgentAccess {
        AgentAccess::new(["solutions@factors.ai"], ["@Internal.Example"])
    }

    #[test]
    fn test_allows_email_and_domain_case_insensitively() {
        let access = access();
        assert!(access.allows("Solutions@Factors.ai"));
        assert!(access.allows("jane@internal.example"));
        assert!(!access.allows("jane@customer.example"));
        assert!(!access.allows("internal.example"));
        assert!(!access.allows(""));
    }

    #[test]
    fn test_label_requires_integration_and_allow_list() {
        let status = IntegrationStatus::new("synced", 1_700_000_000 - 2 * 3_600);
        let access = access();

        assert_eq!(
            last_synced_label(&status, true, Some("a@internal.example"), &access, now()).as_deref(),
            Some("Last synced 2 hours ago")
        );
        assert_eq!(
            last_synced_label(&status, false, Some("a@internal.example"), &access, now()),
            None
        );
        assert_eq!(
            last_synced_label(&status, true, Some("a@customer.example"), &access, now()),
            None
        );
        assert_eq!(last_synced_label(&status, true, None, &access, now()), None);
    }

    #[test]
    fn test_label_skips_missing_timestamp() {
        let status = IntegrationStatus::new("synced", 0);
        assert_eq!(
            last_synced_label(&status, true, Some("solutions@factors.ai"), &access(), now()),
            None
        );
    }

    #[test]
    fn test_humanize_units() {
        assert_eq!(humanize_seconds(0), "0 seconds");
        assert_eq!(humanize_seconds(1), "1 second");
        assert_eq!(humanize_seconds(59), "59 seconds");
        assert_eq!(humanize_seconds(60), "1 minute");
        assert_eq!(humanize_seconds(3 * 86_400 + 5), "3 days");
    }

    #[tokio::test]
    async fn test_superseded_refetch_does_not_overwrite() {
        let api = Arc::new(FakeSettingsApi::default());
        api.set_status(status_map("int_slack", "sync_pending"));
        api.script_read_delays([Duration::from_millis(60), Duration::ZERO]);
        let context = StatusContext::new(api.clone(), 4);

        tokio::join!(context.refetch(), async {
            api.set_status(status_map("int_slack", "synced"));
            context.refetch().await;
        });

        let snapshot = context.snapshot().await;
        assert_eq!(snapshot.get("int_slack").state.as_str(), "synced");
        assert!(!snapshot.loading);
        assert_eq!(api.calls.fetch_status(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_empty_map() {
        let api = Arc::new(FakeSettingsApi::default());
        let context = StatusContext::mount(api, 4).await;
        assert!(!context.loading().await);
        assert!(context.snapshot().await.status.is_empty());
    }

    #[test]
    fn test_snapshot_get_defaults_to_not_synced() {
        let snapshot = StatusSnapshot::default();
        assert_eq!(snapshot.get("int_hubspot"), IntegrationStatus::default());
    }
}
