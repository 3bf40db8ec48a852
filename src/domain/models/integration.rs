//! Integration identity, plan features and static descriptors.
//!
//! `IntegrationId` is a closed set: every per-provider decision (which form to
//! show, which plan feature gates it, which settings keys mean "connected") is
//! an exhaustive `match` over it, so adding a provider fails to compile until
//! every decision has been made for it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// A third-party service that can sync data into a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationId {
    /// Factors JavaScript SDK
    Sdk,
    /// Factors account deanonymisation
    FactorsDeanonymisation,
    /// 6Signal by 6Sense
    SixSignal,
    /// Clearbit Reveal
    ClearbitReveal,
    /// Google Ads
    GoogleAds,
    /// Google Search Console
    GoogleSearchConsole,
    /// Facebook Ads
    Facebook,
    /// LinkedIn Ads
    #[serde(rename = "linkedin")]
    LinkedIn,
    /// Bing Ads
    BingAds,
    /// HubSpot CRM
    Hubspot,
    /// Salesforce CRM
    Salesforce,
    /// Marketo
    Marketo,
    /// LeadSquared
    LeadSquared,
    /// G2 buyer intent
    G2,
    /// Slack alerts
    Slack,
    /// Microsoft Teams alerts
    MicrosoftTeams,
    /// Segment
    Segment,
    /// Rudderstack
    Rudderstack,
    /// Drift chat
    Drift,
}

impl IntegrationId {
    /// Every provider, in no particular order.
    pub const ALL: [Self; 19] = [
        Self::Sdk,
        Self::FactorsDeanonymisation,
        Self::SixSignal,
        Self::ClearbitReveal,
        Self::GoogleAds,
        Self::GoogleSearchConsole,
        Self::Facebook,
        Self::LinkedIn,
        Self::BingAds,
        Self::Hubspot,
        Self::Salesforce,
        Self::Marketo,
        Self::LeadSquared,
        Self::G2,
        Self::Slack,
        Self::MicrosoftTeams,
        Self::Segment,
        Self::Rudderstack,
        Self::Drift,
    ];

    /// Stable string id used in URLs and the backend API.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sdk => "sdk",
            Self::FactorsDeanonymisation => "factors_deanonymisation",
            Self::SixSignal => "six_signal",
            Self::ClearbitReveal => "clearbit_reveal",
            Self::GoogleAds => "google_ads",
            Self::GoogleSearchConsole => "google_search_console",
            Self::Facebook => "facebook",
            Self::LinkedIn => "linkedin",
            Self::BingAds => "bing_ads",
            Self::Hubspot => "hubspot",
            Self::Salesforce => "salesforce",
            Self::Marketo => "marketo",
            Self::LeadSquared => "lead_squared",
            Self::G2 => "g2",
            Self::Slack => "slack",
            Self::MicrosoftTeams => "microsoft_teams",
            Self::Segment => "segment",
            Self::Rudderstack => "rudderstack",
            Self::Drift => "drift",
        }
    }

    /// Plan feature that gates this provider. The SDK is never plan-gated.
    pub const fn required_feature(self) -> Option<Feature> {
        match self {
            Self::Sdk => None,
            Self::FactorsDeanonymisation => Some(Feature::FactorsDeanonymisation),
            Self::SixSignal => Some(Feature::SixSignal),
            Self::ClearbitReveal => Some(Feature::Clearbit),
            Self::GoogleAds => Some(Feature::GoogleAds),
            Self::GoogleSearchConsole => Some(Feature::GoogleOrganic),
            Self::Facebook => Some(Feature::Facebook),
            Self::LinkedIn => Some(Feature::LinkedIn),
            Self::BingAds => Some(Feature::BingAds),
            Self::Hubspot => Some(Feature::Hubspot),
            Self::Salesforce => Some(Feature::Salesforce),
            Self::Marketo => Some(Feature::Marketo),
            Self::LeadSquared => Some(Feature::LeadSquared),
            Self::G2 => Some(Feature::G2),
            Self::Slack => Some(Feature::Slack),
            Self::MicrosoftTeams => Some(Feature::Teams),
            Self::Segment => Some(Feature::Segment),
            Self::Rudderstack => Some(Feature::Rudderstack),
            Self::Drift => Some(Feature::Drift),
        }
    }

    /// Key under which the backend reports this provider's sync status.
    pub fn status_key(self) -> &'static str {
        self.required_feature().map_or(self.as_str(), Feature::as_str)
    }

    /// The provider-specific connect form.
    pub const fn form(self) -> ProviderForm {
        match self {
            Self::Sdk => ProviderForm::SdkSnippet,
            Self::FactorsDeanonymisation => ProviderForm::Toggle {
                flag: "int_factors_six_signal_key",
            },
            Self::SixSignal => ProviderForm::Credentials {
                flag: "int_client_six_signal_key",
                fields: SIX_SIGNAL_FIELDS,
            },
            Self::ClearbitReveal => ProviderForm::Credentials {
                flag: "int_clear_bit",
                fields: CLEARBIT_FIELDS,
            },
            Self::LeadSquared => ProviderForm::Credentials {
                flag: "int_leadsquared",
                fields: LEADSQUARED_FIELDS,
            },
            Self::G2 => ProviderForm::Credentials {
                flag: "int_g2",
                fields: G2_FIELDS,
            },
            Self::LinkedIn => ProviderForm::OAuth {
                flow: OAuthFlow::DirectConsent,
            },
            Self::GoogleAds
            | Self::GoogleSearchConsole
            | Self::Facebook
            | Self::BingAds
            | Self::Hubspot
            | Self::Salesforce
            | Self::Marketo
            | Self::Slack
            | Self::MicrosoftTeams => ProviderForm::OAuth {
                flow: OAuthFlow::BackendRedirect,
            },
            Self::Segment => ProviderForm::Toggle { flag: "int_segment" },
            Self::Rudderstack => ProviderForm::Toggle {
                flag: "int_rudderstack",
            },
            Self::Drift => ProviderForm::Toggle { flag: "int_drift" },
        }
    }
}

impl fmt::Display for IntegrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegrationId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DomainError::IntegrationNotFound(needle.to_string()))
    }
}

/// Plan feature identifier for a plan-gated integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// `int_segment`
    #[serde(rename = "int_segment")]
    Segment,
    /// `int_rudderstack`
    #[serde(rename = "int_rudderstack")]
    Rudderstack,
    /// `int_google_ads`
    #[serde(rename = "int_google_ads")]
    GoogleAds,
    /// `int_facebook`
    #[serde(rename = "int_facebook")]
    Facebook,
    /// `int_linkedin`
    #[serde(rename = "int_linkedin")]
    LinkedIn,
    /// `int_bing_ads`
    #[serde(rename = "int_bing_ads")]
    BingAds,
    /// `int_hubspot`
    #[serde(rename = "int_hubspot")]
    Hubspot,
    /// `int_salesforce`
    #[serde(rename = "int_salesforce")]
    Salesforce,
    /// `int_marketo`
    #[serde(rename = "int_marketo")]
    Marketo,
    /// `int_leadsquared`
    #[serde(rename = "int_leadsquared")]
    LeadSquared,
    /// `int_clear_bit`
    #[serde(rename = "int_clear_bit")]
    Clearbit,
    /// `int_six_signal`
    #[serde(rename = "int_six_signal")]
    SixSignal,
    /// `int_factors_deanonymisation`
    #[serde(rename = "int_factors_deanonymisation")]
    FactorsDeanonymisation,
    /// `int_slack`
    #[serde(rename = "int_slack")]
    Slack,
    /// `int_teams`
    #[serde(rename = "int_teams")]
    Teams,
    /// `int_drift`
    #[serde(rename = "int_drift")]
    Drift,
    /// `int_g2`
    #[serde(rename = "int_g2")]
    G2,
    /// `int_google_organic`
    #[serde(rename = "int_google_organic")]
    GoogleOrganic,
}

impl Feature {
    const ALL: [Self; 18] = [
        Self::Segment,
        Self::Rudderstack,
        Self::GoogleAds,
        Self::Facebook,
        Self::LinkedIn,
        Self::BingAds,
        Self::Hubspot,
        Self::Salesforce,
        Self::Marketo,
        Self::LeadSquared,
        Self::Clearbit,
        Self::SixSignal,
        Self::FactorsDeanonymisation,
        Self::Slack,
        Self::Teams,
        Self::Drift,
        Self::G2,
        Self::GoogleOrganic,
    ];

    /// Name used by the plan and status payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Segment => "int_segment",
            Self::Rudderstack => "int_rudderstack",
            Self::GoogleAds => "int_google_ads",
            Self::Facebook => "int_facebook",
            Self::LinkedIn => "int_linkedin",
            Self::BingAds => "int_bing_ads",
            Self::Hubspot => "int_hubspot",
            Self::Salesforce => "int_salesforce",
            Self::Marketo => "int_marketo",
            Self::LeadSquared => "int_leadsquared",
            Self::Clearbit => "int_clear_bit",
            Self::SixSignal => "int_six_signal",
            Self::FactorsDeanonymisation => "int_factors_deanonymisation",
            Self::Slack => "int_slack",
            Self::Teams => "int_teams",
            Self::Drift => "int_drift",
            Self::G2 => "int_g2",
            Self::GoogleOrganic => "int_google_organic",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = DomainError;

    /// Case-insensitive, so `INT_SIX_SIGNAL` and `int_six_signal` agree.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|feature| feature.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DomainError::UnknownFeature(needle.to_string()))
    }
}

/// Catalog grouping shown as tabs on the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationCategory {
    /// SDK install
    Sdk,
    /// Reverse-IP account identification
    AccountIdentification,
    /// CRMs and marketing automation
    Crm,
    /// Ad platforms
    Ads,
    /// Review sites
    Review,
    /// Chat and alerting apps
    Communication,
    /// Customer data platforms
    Cdp,
    /// Website chat
    Chatbot,
}

impl IntegrationCategory {
    /// Every category in display order.
    pub const ALL: [Self; 8] = [
        Self::Sdk,
        Self::AccountIdentification,
        Self::Crm,
        Self::Ads,
        Self::Review,
        Self::Communication,
        Self::Cdp,
        Self::Chatbot,
    ];

    /// Stable id used on the command line and in JSON.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sdk => "sdk",
            Self::AccountIdentification => "account_identification",
            Self::Crm => "crm",
            Self::Ads => "ads",
            Self::Review => "review",
            Self::Communication => "communication",
            Self::Cdp => "cdp",
            Self::Chatbot => "chatbot",
        }
    }

    /// Tab title.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Sdk => "SDK",
            Self::AccountIdentification => "Account Identification",
            Self::Crm => "CRMs & MAPs",
            Self::Ads => "Ad Platforms",
            Self::Review => "Review Platforms",
            Self::Communication => "Communication Apps",
            Self::Cdp => "Customer Data Platforms (CDP)",
            Self::Chatbot => "Chatbot",
        }
    }

    /// Tab position, starting at 1.
    pub const fn sort_order(self) -> u8 {
        match self {
            Self::Sdk => 1,
            Self::AccountIdentification => 2,
            Self::Crm => 3,
            Self::Ads => 4,
            Self::Review => 5,
            Self::Communication => 6,
            Self::Cdp => 7,
            Self::Chatbot => 8,
        }
    }
}

impl fmt::Display for IntegrationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegrationCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DomainError::UnknownCategory(needle.to_string()))
    }
}

/// How an OAuth provider obtains user consent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuthFlow {
    /// The backend issues the consent URL and handles the callback.
    BackendRedirect,
    /// The client builds the consent URL and receives the code itself.
    DirectConsent,
}

/// A credential input on a provider form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CredentialField {
    /// Settings key the value is written to
    pub key: &'static str,
    /// Label shown next to the input and in validation messages
    pub label: &'static str,
    /// Whether the value must be redacted from logs
    pub secret: bool,
}

impl CredentialField {
    /// Input whose value is redacted from logs.
    pub const fn secret(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            secret: true,
        }
    }

    /// Input whose value may be logged.
    pub const fn plain(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            secret: false,
        }
    }
}

/// The provider-specific connect form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderForm {
    /// Install instructions for the JavaScript SDK.
    SdkSnippet,
    /// Redirect-based consent flow.
    OAuth {
        /// Who builds the consent URL
        flow: OAuthFlow,
    },
    /// Credentials typed in by the user, stored alongside `flag`.
    Credentials {
        /// Settings flag marking the provider enabled
        flag: &'static str,
        /// Required inputs
        fields: &'static [CredentialField],
    },
    /// A single enable switch.
    Toggle {
        /// Settings flag the switch writes
        flag: &'static str,
    },
}

impl ProviderForm {
    /// Settings flag written on connect/disconnect, if the form owns one.
    pub const fn flag(&self) -> Option<&'static str> {
        match self {
            Self::Credentials { flag, .. } | Self::Toggle { flag } => Some(*flag),
            Self::SdkSnippet | Self::OAuth { .. } => None,
        }
    }
}

const SIX_SIGNAL_FIELDS: &[CredentialField] =
    &[CredentialField::secret("client6_signal_key", "6Signal API key")];

const CLEARBIT_FIELDS: &[CredentialField] =
    &[CredentialField::secret("clearbit_key", "Clearbit API key")];

const LEADSQUARED_FIELDS: &[CredentialField] = &[
    CredentialField::secret("int_leadsquared_access_key", "Access Key"),
    CredentialField::secret("int_leadsquared_secret_key", "Secret Key"),
    CredentialField::plain("int_leadsquared_host", "Host"),
];

const G2_FIELDS: &[CredentialField] = &[CredentialField::secret("int_g2_api_key", "G2 API key")];

/// Help text shown in a card's instruction menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Instructions {
    /// Menu heading
    pub title: &'static str,
    /// Menu body
    pub description: &'static str,
}

/// One catalog entry. Defined at build time and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrationDescriptor {
    /// Catalog id
    pub id: IntegrationId,
    /// Tab the entry is listed under
    pub category: IntegrationCategory,
    /// Display name, also matched by search
    pub name: &'static str,
    /// One-line blurb, also matched by search
    pub description: &'static str,
    /// Icon asset name
    pub icon: &'static str,
    /// Help article
    pub kb_link: Option<&'static str>,
    /// Instruction menu content
    pub instructions: Option<Instructions>,
    /// Only visible to agents on the internal allow-list
    pub internal_only: bool,
}

impl IntegrationDescriptor {
    /// Plan feature gating this entry, if any.
    pub const fn required_feature(&self) -> Option<Feature> {
        self.id.required_feature()
    }

    /// Connect form for this entry.
    pub const fn form(&self) -> ProviderForm {
        self.id.form()
    }

    /// Key of this entry in the status map.
    pub fn status_key(&self) -> &'static str {
        self.id.status_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integration_id_round_trips_through_str() {
        for id in IntegrationId::ALL {
            assert_eq!(id.as_str().parse::<IntegrationId>().unwrap(), id);
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_feature_parse_is_case_insensitive() {
        assert_eq!("INT_SIX_SIGNAL".parse::<Feature>().unwrap(), Feature::SixSignal);
        assert_eq!("int_six_signal".parse::<Feature>().unwrap(), Feature::SixSignal);
        assert!("int_unknown".parse::<Feature>().is_err());
    }

    #[test]
    fn test_feature_serde_matches_as_str() {
        for feature in Feature::ALL {
            let json = serde_json::to_string(&feature).unwrap();
            assert_eq!(json, format!("\"{}\"", feature.as_str()));
        }
    }

    #[test]
    fn test_sdk_is_not_plan_gated() {
        assert_eq!(IntegrationId::Sdk.required_feature(), None);
        assert_eq!(IntegrationId::Sdk.status_key(), "sdk");
        assert_eq!(IntegrationId::Hubspot.status_key(), "int_hubspot");
    }

    #[test]
    fn test_form_flags() {
        assert_eq!(IntegrationId::Drift.form().flag(), Some("int_drift"));
        assert_eq!(IntegrationId::G2.form().flag(), Some("int_g2"));
        assert_eq!(IntegrationId::Hubspot.form().flag(), None);
        assert!(matches!(
            IntegrationId::LinkedIn.form(),
            ProviderForm::OAuth {
                flow: OAuthFlow::DirectConsent
            }
        ));
    }

    #[test]
    fn test_unknown_integration_id() {
        let err = "myspace".parse::<IntegrationId>().unwrap_err();
        assert_eq!(err.to_string(), "Integration not found: myspace");
    }
}
