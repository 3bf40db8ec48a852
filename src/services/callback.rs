//! Inbound OAuth callback parsing and direct-consent URLs.
//!
//! The settings route inspects its URL once on entry. Whatever the provider
//! (or the backend on its behalf) appended to the query string becomes a typed
//! [`InboundCallback`]; URLs that carry none of the callback parameters are
//! not callbacks at all.

use tracing::{debug, warn};
use url::Url;

use crate::domain::models::{
    CallbackOutcome, InboundCallback, IntegrationId, OAuthConfig,
};

/// Path the backend sends the browser back to after Google Ads consent.
pub const GOOGLE_ADS_INTERNAL_REDIRECT_PATH: &str = "/adwords/auth/redirect";

const LINKEDIN_AUTHORIZE_URL: &str = "https://www.linkedin.com/oauth/v2/authorization";
const LINKEDIN_SCOPES: &str = "r_basicprofile r_liteprofile r_ads_reporting r_ads";

fn parse_url(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("http://localhost")
            .and_then(|base| base.join(raw))
            .ok(),
        Err(err) => {
            warn!(error = %err, "Ignoring unparseable callback URL");
            None
        }
    }
}

/// Toast text for a provider error code. Every underscore becomes a space,
/// not only the first, so multi-word codes read as plain words.
fn humanize(raw: &str) -> String {
    raw.replace('_', " ").to_lowercase()
}

/// Parse the route URL into a callback result, if it is one.
pub fn parse_inbound_callback(raw_url: &str, oauth: &OAuthConfig) -> Option<InboundCallback> {
    let url = parse_url(raw_url.trim())?;

    let mut error = None;
    let mut status = None;
    let mut code = None;
    let mut state = None;
    let mut provider = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "error" => error = Some(value.into_owned()),
            "status" => status = Some(value.into_owned()),
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "provider" => provider = value.parse::<IntegrationId>().ok(),
            _ => {}
        }
    }

    let provider = provider.or_else(|| {
        url.path_segments()
            .and_then(|mut segments| segments.rfind(|segment| !segment.is_empty()))
            .and_then(|segment| segment.parse::<IntegrationId>().ok())
    });
    let default_open = url.path().contains(GOOGLE_ADS_INTERNAL_REDIRECT_PATH);

    let callback = if let Some(error) = error.filter(|e| !e.trim().is_empty()) {
        InboundCallback {
            outcome: CallbackOutcome::Error,
            provider,
            message: Some(humanize(&error)),
            code: None,
            default_open,
        }
    } else if let Some(status) = status.filter(|s| !s.trim().is_empty()) {
        InboundCallback {
            outcome: CallbackOutcome::Error,
            provider,
            message: Some(format!(
                "Error: {}. Sorry! That doesn't seem right. Please try again",
                humanize(&status)
            )),
            code: None,
            default_open,
        }
    } else if let Some(code) = code.filter(|c| !c.is_empty()) {
        if state.as_deref() != Some(oauth.state.as_str()) {
            warn!("OAuth callback state mismatch, ignoring authorization code");
            InboundCallback {
                outcome: CallbackOutcome::Error,
                provider,
                message: Some("Authorization could not be verified. Please try again".to_string()),
                code: None,
                default_open,
            }
        } else {
            InboundCallback {
                outcome: CallbackOutcome::Success,
                provider: provider.or(Some(IntegrationId::LinkedIn)),
                message: None,
                code: Some(code),
                default_open: true,
            }
        }
    } else if default_open {
        InboundCallback {
            outcome: CallbackOutcome::Success,
            provider: provider.or(Some(IntegrationId::GoogleAds)),
            message: None,
            code: None,
            default_open,
        }
    } else {
        return None;
    };

    debug!(
        outcome = ?callback.outcome,
        provider = ?callback.provider,
        "Parsed inbound OAuth callback"
    );
    Some(callback)
}

/// Consent URL for providers whose consent page the client opens itself.
///
/// Returns `None` when the provider is not configured.
pub fn direct_consent_url(integration: IntegrationId, oauth: &OAuthConfig) -> Option<String> {
    match integration {
        IntegrationId::LinkedIn => {
            let client_id = oauth.linkedin_client_id.as_deref()?;
            let redirect_uri = oauth.redirect_base.trim_end_matches('/');
            let url = Url::parse_with_params(
                LINKEDIN_AUTHORIZE_URL,
                &[
                    ("response_type", "code"),
                    ("client_id", client_id),
                    ("redirect_uri", redirect_uri),
                    ("state", oauth.state.as_str()),
                    ("scope", LINKEDIN_SCOPES),
                ],
            )
            .ok()?;
            Some(url.into())
        }
        _ => None,
    }
}
