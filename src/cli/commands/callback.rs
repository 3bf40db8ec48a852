//! Interpret an OAuth return URL without calling the backend.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{CallbackOutcome, Config, InboundCallback};
use crate::services::parse_inbound_callback;

/// Result of the `callback` command.
#[derive(Debug, Serialize)]
pub struct CallbackOutput {
    /// URL as given
    pub url: String,
    /// Parsed callback, if the URL was one
    pub callback: Option<InboundCallback>,
}

impl CommandOutput for CallbackOutput {
    fn to_human(&self) -> String {
        let Some(callback) = &self.callback else {
            return "Not an OAuth callback URL.".to_string();
        };
        let outcome = match callback.outcome {
            CallbackOutcome::Success => "success",
            CallbackOutcome::Error => "error",
        };
        let provider = callback
            .provider
            .map_or_else(|| "unknown".to_string(), |id| id.to_string());
        let mut lines = vec![
            format!("Outcome:  {outcome}"),
            format!("Provider: {provider}"),
        ];
        if let Some(message) = &callback.message {
            lines.push(format!("Message:  {message}"));
        }
        if callback.code.is_some() {
            lines.push("Authorization code received".to_string());
        }
        lines.join("\n")
    }
}

/// Parse `url` and print the outcome.
pub fn execute(url: &str, config: &Config, json: bool) -> Result<()> {
    let out = CallbackOutput {
        url: url.to_string(),
        callback: parse_inbound_callback(url, &config.oauth),
    };
    output(&out, json);
    Ok(())
}
