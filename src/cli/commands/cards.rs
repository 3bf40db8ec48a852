//! Render the settings page for a project.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;

use super::settings_api;
use crate::cli::output::{create_spinner, output, CommandOutput, TableFormatter};
use crate::domain::models::{CardUiState, Config, IntegrationId};
use crate::domain::ports::ProjectId;
use crate::services::{AgentAccess, CategorySelection, Notification, PageView, SettingsPage, Viewer};

/// Arguments of the `cards` command.
#[derive(Debug, Clone, Default)]
pub struct CardsArgs {
    /// Project id
    pub project_id: ProjectId,
    /// Selected tab
    pub category: CategorySelection,
    /// Search text
    pub query: String,
    /// Viewer's email
    pub agent_email: Option<String>,
    /// Cards the user expanded
    pub open: Vec<IntegrationId>,
    /// Entry URL
    pub callback_url: Option<String>,
}

/// Result of the `cards` command.
#[derive(Debug, Serialize)]
pub struct CardsOutput {
    /// Project id
    pub project_id: ProjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Callback toast, if any
    pub notification: Option<Notification>,
    /// Rendered page
    pub page: PageView,
}

impl CommandOutput for CardsOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if let Some(notification) = &self.notification {
            let prefix = if notification.is_success() { "✓" } else { "✗" };
            lines.push(format!("{prefix} {}", notification.message()));
        }
        match &self.page {
            PageView::Loading => lines.push("Settings are still loading.".to_string()),
            PageView::Unavailable { message } => {
                lines.push(format!("Integration settings unavailable: {message}"));
            }
            PageView::Ready { cards } if cards.is_empty() => {
                lines.push("No integrations match.".to_string());
            }
            PageView::Ready { cards } => lines.push(TableFormatter::new().format_cards(cards)),
        }
        lines.join("\n")
    }
}

/// Mount the page and print its cards.
pub async fn execute(args: CardsArgs, config: &Config, json: bool) -> Result<()> {
    let api = settings_api(config)?;
    let viewer = Viewer {
        email: args.agent_email,
        access: AgentAccess::from_config(&config.access),
    };

    let spinner = create_spinner("Loading integration settings...", json);
    let page = SettingsPage::mount(
        api,
        args.project_id,
        viewer,
        config,
        args.callback_url.as_deref(),
    )
    .await;
    spinner.finish_and_clear();

    let ui_states: HashMap<IntegrationId, CardUiState> = args
        .open
        .into_iter()
        .map(|id| (id, CardUiState::opened()))
        .collect();

    let out = CardsOutput {
        project_id: args.project_id,
        notification: page.callback_notification(),
        page: page.cards(args.category, &args.query, &ui_states).await,
    };
    output(&out, json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_output_for_unavailable_page() {
        let out = CardsOutput {
            project_id: 3,
            notification: Some(Notification::Error("access denied".to_string())),
            page: PageView::Unavailable {
                message: "Something went wrong. Please try again".to_string(),
            },
        };
        let human = out.to_human();
        assert!(human.starts_with("✗ access denied"));
        assert!(human.contains("Integration settings unavailable"));
        assert_eq!(out.to_json()["page"]["state"], "unavailable");
    }
}
