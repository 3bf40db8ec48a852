//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::models::IntegrationId;
use crate::domain::ports::ProjectId;
use crate::services::CategorySelection;

/// Top-level arguments.
#[derive(Parser, Debug)]
#[command(name = "integration-settings")]
#[command(about = "Inspect and manage a project's third-party integrations", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .integration-settings/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the integration catalog
    Catalog {
        /// Category id, or "all"
        #[arg(short = 'C', long, default_value = "all")]
        category: CategorySelection,

        /// Free-text search over names; overrides the category
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// List catalog categories
    Categories,

    /// Show backend sync status for a project
    Status {
        /// Project id
        #[arg(short, long)]
        project: ProjectId,
    },

    /// Render the settings page cards for a project
    Cards {
        /// Project id
        #[arg(short, long)]
        project: ProjectId,

        /// Category id, or "all"
        #[arg(short = 'C', long, default_value = "all")]
        category: CategorySelection,

        /// Free-text search over names and descriptions
        #[arg(short, long, default_value = "")]
        query: String,

        /// Email of the agent viewing the page
        #[arg(long)]
        agent_email: Option<String>,

        /// Cards the user has expanded
        #[arg(long, value_delimiter = ',')]
        open: Vec<IntegrationId>,

        /// URL the page was opened with, e.g. after an OAuth redirect
        #[arg(long)]
        callback_url: Option<String>,
    },

    /// Enable a credential or toggle integration
    Connect {
        /// Project id
        #[arg(short, long)]
        project: ProjectId,

        /// Integration id, e.g. hubspot
        integration: IntegrationId,

        /// Form value as key=value; repeatable
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Turn an integration off
    Disconnect {
        /// Project id
        #[arg(short, long)]
        project: ProjectId,

        /// Integration id, e.g. hubspot
        integration: IntegrationId,
    },

    /// Print the consent URL for an OAuth integration
    OauthUrl {
        /// Project id
        #[arg(short, long)]
        project: ProjectId,

        /// Integration id, e.g. hubspot
        integration: IntegrationId,

        /// Where the provider should send the browser back to
        #[arg(long)]
        return_url: Option<String>,
    },

    /// Interpret the URL an OAuth provider redirected back to
    Callback {
        /// Full redirect URL or route path
        url: String,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::IntegrationCategory;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("int_g2_api_key=abc=def").unwrap(),
            ("int_g2_api_key".to_string(), "abc=def".to_string())
        );
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=value").is_err());
    }

    #[test]
    fn test_cards_arguments() {
        let cli = Cli::try_parse_from([
            "integration-settings",
            "--json",
            "cards",
            "--project",
            "42",
            "--category",
            "crm",
            "--open",
            "hubspot,salesforce",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Cards {
                project,
                category,
                open,
                ..
            } => {
                assert_eq!(project, 42);
                assert_eq!(category, CategorySelection::Only(IntegrationCategory::Crm));
                assert_eq!(open, vec![IntegrationId::Hubspot, IntegrationId::Salesforce]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_integration_is_rejected() {
        let result = Cli::try_parse_from([
            "integration-settings",
            "disconnect",
            "--project",
            "1",
            "myspace",
        ]);
        assert!(result.is_err());
    }
}
