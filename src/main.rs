//! integration-settings CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use integration_settings::cli::commands::cards::CardsArgs;
use integration_settings::cli::commands::{callback, cards, catalog, connect, status};
use integration_settings::cli::{handle_error, Cli, Commands};
use integration_settings::domain::models::Config;
use integration_settings::infrastructure::config::ConfigLoader;
use integration_settings::infrastructure::logging::{LogConfig, LoggerImpl};

fn load_config(cli: &Cli) -> Result<Config> {
    match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let log_config = LogConfig::try_from(&config.logging).map_err(anyhow::Error::msg)?;
    let _logger = LoggerImpl::init(&log_config).context("Failed to initialize logging")?;

    let json = cli.json;
    match cli.command {
        Commands::Catalog { category, query } => catalog::execute(category, &query, json),
        Commands::Categories => catalog::execute_categories(json),
        Commands::Status { project } => status::execute(project, &config, json).await,
        Commands::Cards {
            project,
            category,
            query,
            agent_email,
            open,
            callback_url,
        } => {
            let args = CardsArgs {
                project_id: project,
                category,
                query,
                agent_email,
                open,
                callback_url,
            };
            cards::execute(args, &config, json).await
        }
        Commands::Connect {
            project,
            integration,
            fields,
        } => connect::execute_connect(project, integration, fields, &config, json).await,
        Commands::Disconnect {
            project,
            integration,
        } => connect::execute_disconnect(project, integration, &config, json).await,
        Commands::OauthUrl {
            project,
            integration,
            return_url,
        } => connect::execute_oauth_url(project, integration, return_url, &config, json).await,
        Commands::Callback { url } => callback::execute(&url, &config, json),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json);
    }
}
