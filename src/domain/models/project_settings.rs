//! Project settings payload and per-provider connection state.
//!
//! The settings payload is kept as a raw JSON object. Each provider reads only
//! its own keys, so one malformed value breaks one card instead of the whole
//! payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::integration::IntegrationId;

/// A settings value did not have the shape its provider expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The key holds a different JSON type
    #[error("settings key '{key}' should be {expected}, found {found}")]
    UnexpectedType {
        /// Settings key
        key: String,
        /// Type the provider reads
        expected: &'static str,
        /// Type actually stored
        found: &'static str,
    },
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Project settings as returned by `GET /projects/{id}/settings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectSettings(Map<String, Value>);

impl ProjectSettings {
    /// Wrap a raw settings object.
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    /// Boolean flag. Missing or `null` reads as `false`.
    pub fn flag(&self, key: &str) -> Result<bool, SettingsError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(other) => Err(SettingsError::UnexpectedType {
                key: key.to_string(),
                expected: "a boolean",
                found: json_type(other),
            }),
        }
    }

    /// Text value. Missing, `null` and empty strings read as `None`.
    pub fn text(&self, key: &str) -> Result<Option<String>, SettingsError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(Value::Number(number)) => Ok(Some(number.to_string())),
            Some(other) => Err(SettingsError::UnexpectedType {
                key: key.to_string(),
                expected: "a string",
                found: json_type(other),
            }),
        }
    }

    fn has_text(&self, key: &str) -> Result<bool, SettingsError> {
        Ok(self.text(key)?.is_some())
    }

    /// Merge a patch into these settings (used to reflect a successful PUT).
    pub fn apply(&mut self, patch: &SettingsPatch) {
        for (key, value) in &patch.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// The raw settings object.
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Whether `id` is connected according to its own settings keys.
    pub fn connection(&self, id: IntegrationId) -> Result<Connection, SettingsError> {
        let connection = match id {
            IntegrationId::Sdk => Connection::from_flag(self.flag("sdk_verified")?),
            IntegrationId::FactorsDeanonymisation => {
                Connection::from_flag(self.flag("int_factors_six_signal_key")?)
            }
            IntegrationId::SixSignal => {
                Connection::from_flag(self.flag("int_client_six_signal_key")?)
            }
            IntegrationId::ClearbitReveal => Connection::from_flag(self.flag("int_clear_bit")?),
            IntegrationId::GoogleAds => self.selection(
                "int_adwords_enabled_agent_uuid",
                "int_adwords_customer_account_id",
                "Account(s) Selection Pending.",
            )?,
            IntegrationId::GoogleSearchConsole => self.selection(
                "int_google_organic_enabled_agent_uuid",
                "int_google_organic_url_prefixes",
                "URL(s) Selection Pending.",
            )?,
            IntegrationId::Facebook => {
                Connection::from_flag(self.has_text("int_facebook_ad_account")?)
            }
            IntegrationId::LinkedIn => {
                Connection::from_flag(self.has_text("int_linkedin_ad_account")?)
            }
            IntegrationId::BingAds => Connection::from_flag(self.flag("int_bing_ads")?),
            IntegrationId::Hubspot => Connection::from_flag(self.flag("int_hubspot")?),
            IntegrationId::Salesforce => {
                Connection::from_flag(self.has_text("int_salesforce_enabled_agent_uuid")?)
            }
            IntegrationId::Marketo => Connection::from_flag(self.flag("int_marketo")?),
            IntegrationId::LeadSquared => Connection::from_flag(self.flag("int_leadsquared")?),
            IntegrationId::G2 => Connection::from_flag(self.flag("int_g2")?),
            IntegrationId::Slack => Connection::from_flag(self.flag("int_slack")?),
            IntegrationId::MicrosoftTeams => Connection::from_flag(self.flag("int_teams")?),
            IntegrationId::Segment => Connection::from_flag(self.flag("int_segment")?),
            IntegrationId::Rudderstack => Connection::from_flag(self.flag("int_rudderstack")?),
            IntegrationId::Drift => Connection::from_flag(self.flag("int_drift")?),
        };
        Ok(connection)
    }

    /// OAuth providers that authorize first and ask for a selection second.
    fn selection(
        &self,
        enabled_key: &str,
        selection_key: &str,
        pending_hint: &'static str,
    ) -> Result<Connection, SettingsError> {
        let enabled = self.has_text(enabled_key)?;
        let selected = self.has_text(selection_key)?;
        Ok(Connection {
            connected: enabled,
            selection_pending: (enabled && !selected).then_some(pending_hint),
        })
    }
}

impl From<Value> for ProjectSettings {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

/// Connection state derived from a provider's settings keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Connection {
    /// The provider counts as connected
    pub connected: bool,
    /// Set when authorization finished but the user has not picked what to sync
    pub selection_pending: Option<&'static str>,
}

impl Connection {
    /// Connection driven by a single flag.
    pub const fn from_flag(connected: bool) -> Self {
        Self {
            connected,
            selection_pending: None,
        }
    }
}

/// Partial settings update sent with `PUT /projects/{id}/settings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SettingsPatch(Map<String, Value>);

impl SettingsPatch {
    /// Empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a boolean key.
    #[must_use]
    pub fn flag(mut self, key: &str, enabled: bool) -> Self {
        self.0.insert(key.to_string(), Value::Bool(enabled));
        self
    }

    /// Set a string key.
    #[must_use]
    pub fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), Value::String(value.into()));
        self
    }

    /// Value queued for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys queued, without values.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(value: Value) -> ProjectSettings {
        ProjectSettings::from(value)
    }

    #[test]
    fn test_flag_reads_missing_as_false() {
        let s = settings(json!({"int_hubspot": true, "int_drift": null}));
        assert!(s.flag("int_hubspot").unwrap());
        assert!(!s.flag("int_drift").unwrap());
        assert!(!s.flag("int_segment").unwrap());
    }

    #[test]
    fn test_flag_rejects_wrong_type() {
        let s = settings(json!({"int_hubspot": "yes"}));
        let err = s.flag("int_hubspot").unwrap_err();
        assert_eq!(
            err.to_string(),
            "settings key 'int_hubspot' should be a boolean, found a string"
        );
    }

    #[test]
    fn test_google_ads_selection_pending() {
        let s = settings(json!({"int_adwords_enabled_agent_uuid": "agent-1"}));
        let connection = s.connection(IntegrationId::GoogleAds).unwrap();
        assert!(connection.connected);
        assert_eq!(connection.selection_pending, Some("Account(s) Selection Pending."));

        let s = settings(json!({
            "int_adwords_enabled_agent_uuid": "agent-1",
            "int_adwords_customer_account_id": "123-456"
        }));
        let connection = s.connection(IntegrationId::GoogleAds).unwrap();
        assert!(connection.connected);
        assert_eq!(connection.selection_pending, None);
    }

    #[test]
    fn test_linkedin_requires_ad_account() {
        let s = settings(json!({"int_linkedin_ad_account": ""}));
        assert!(!s.connection(IntegrationId::LinkedIn).unwrap().connected);
        let s = settings(json!({"int_linkedin_ad_account": "5083"}));
        assert!(s.connection(IntegrationId::LinkedIn).unwrap().connected);
    }

    #[test]
    fn test_apply_patch() {
        let mut s = ProjectSettings::default();
        s.apply(&SettingsPatch::new().flag("int_g2", true).text("int_g2_api_key", "k"));
        assert!(s.connection(IntegrationId::G2).unwrap().connected);
        assert_eq!(s.text("int_g2_api_key").unwrap().as_deref(), Some("k"));
    }

    #[test]
    fn test_every_provider_disconnected_on_empty_settings() {
        let s = ProjectSettings::default();
        for id in IntegrationId::ALL {
            assert!(!s.connection(id).unwrap().connected, "{id}");
        }
    }
}
