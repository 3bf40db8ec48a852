//! Integration registry.
//!
//! The [`IntegrationRegistry`] is the static catalog of every provider the
//! settings page can show, in display order. It is built once and never
//! mutated; lookups by id return [`DomainError::IntegrationNotFound`] on a miss.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Instructions, IntegrationCategory, IntegrationDescriptor, IntegrationId,
};

const DETAILS: &str = "Integration Details";

const fn details(description: &'static str) -> Option<Instructions> {
    Some(Instructions {
        title: DETAILS,
        description,
    })
}

const CATALOG: &[IntegrationDescriptor] = &[
    IntegrationDescriptor {
        id: IntegrationId::Sdk,
        category: IntegrationCategory::Sdk,
        name: "Javascript SDK",
        description: "Place Factors SDK on your website to identify accounts visiting your website and track their activity",
        icon: "Brand",
        kb_link: None,
        instructions: None,
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::FactorsDeanonymisation,
        category: IntegrationCategory::AccountIdentification,
        name: "Factors Account Identification",
        description: "Gain insight into who is visiting your website and where they are in the buying journey",
        icon: "Brand",
        kb_link: None,
        instructions: None,
        internal_only: true,
    },
    IntegrationDescriptor {
        id: IntegrationId::SixSignal,
        category: IntegrationCategory::AccountIdentification,
        name: "6Signal by 6Sense",
        description: "Use 6Signal by 6Sense to identify accounts. Your usage will be billed by 6Signal directly.",
        icon: "SixSignalLogo",
        kb_link: Some("https://help.factors.ai/en/articles/7261968-6signal-by-6sense-integration"),
        instructions: None,
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::ClearbitReveal,
        category: IntegrationCategory::AccountIdentification,
        name: "Clearbit Reveal",
        description: "Use Clearbit Reveal to identify accounts. Your usage will be billed by Clearbit directly.",
        icon: "ClearbitLogo",
        kb_link: Some("https://help.factors.ai/en/articles/7261981-clearbit-reveal-integration"),
        instructions: None,
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::GoogleAds,
        category: IntegrationCategory::Ads,
        name: "Google Ads",
        description: "Integrate reporting from Google Search, Youtube and Display Network",
        icon: "Google_ads",
        kb_link: Some("https://help.factors.ai/en/articles/7283695-google-ads-integration"),
        instructions: details(
            "Click Enable using Google, you will be redirected to authorise the connection between Factors and your Google account. Once you have authorised the connection, you will be asked to select the ad account that you wish to bring data from. Data will only be pulled once an account has been selected.",
        ),
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::GoogleSearchConsole,
        category: IntegrationCategory::Ads,
        name: "Google Search Console",
        description: "Track organic search impressions, clicks and position from Google Search",
        icon: "Google",
        kb_link: Some("https://help.factors.ai/en/articles/7283784-google-search-console-integration"),
        instructions: details(
            "Click Enable using Google, you will be redirected to authorise the connection between Factors and your Search Console account. Once you have authorised the connection, you will be asked to select the URL(s) that you wish to bring data from. Data will only be pulled once a URL has been selected.",
        ),
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::Facebook,
        category: IntegrationCategory::Ads,
        name: "Facebook",
        description: "Pull in reports from Facebook, Instagram and Facebook Audience Network",
        icon: "Facebook_ads",
        kb_link: Some("https://help.factors.ai/en/articles/7283696-facebook-ads-integration"),
        instructions: details(
            "Click Login with Facebook, you will be redirected to authorise the connection between Factors and your Facebook account. Once you have authorised the connection, you will be asked to select the ad account that you wish to bring data from. Data will only be pulled once an account has been selected.",
        ),
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::LinkedIn,
        category: IntegrationCategory::Ads,
        name: "LinkedIn",
        description: "Sync LinkedIn ads reports with Factors for performance reporting",
        icon: "Linkedin_ads",
        kb_link: Some("https://help.factors.ai/en/articles/7283729-linkedin-ads-integration"),
        instructions: details(
            "Click Connect Now, you will be redirected to authorise the connection between Factors and your LinkedIn account. Once you have authorised the connection, you will be asked to select the ad account that you wish to bring data from. Data will only be pulled once an account has been selected.",
        ),
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::BingAds,
        category: IntegrationCategory::Ads,
        name: "Bing Ads",
        description: "Sync Bing ads reports with Factors for performance reporting",
        icon: "Bing",
        kb_link: Some("https://help.factors.ai/en/articles/7831204-bing-ads-integration"),
        instructions: details(
            "Click Connect Now, you will be redirected to authorise the connection between Factors and your Microsoft Advertising account. Once you have authorised the connection, you will be asked to select the Bing ad account that you wish to bring data from. Data will only be pulled once an account has been selected.",
        ),
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::Hubspot,
        category: IntegrationCategory::Crm,
        name: "Hubspot",
        description: "Sync your Contact, Company and Deal objects with Factors on a daily basis",
        icon: "Hubspot_ads",
        kb_link: Some("https://help.factors.ai/en/articles/7261985-hubspot-integration"),
        instructions: details(
            "Click Enable using Hubspot, you will be redirected to authorise the connection between Factors and HubSpot.",
        ),
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::Salesforce,
        category: IntegrationCategory::Crm,
        name: "Salesforce",
        description: "Sync your Leads, Contact, Account, Opportunity and Campaign objects with Factors on a daily basis",
        icon: "Salesforce_ads",
        kb_link: Some("https://help.factors.ai/en/articles/7261989-salesforce-integration"),
        instructions: details(
            "Click Connect Salesforce, you will be redirected to authorise the connection between Factors and Salesforce.",
        ),
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::Marketo,
        category: IntegrationCategory::Crm,
        name: "Marketo",
        description: "Marketo is a leader in marketing automation. Using our Marketo source, we will ingest your Program, Campaign, Person and List records into Factors",
        icon: "Marketo",
        kb_link: None,
        instructions: details(
            "Click Connect Marketo, you will be redirected to authorise the connection between Factors and Marketo. Simple follow the instructions that are displayed in the next step to add details about the API endpoint, client ID and client secret to establish the data connection between Factors and Marketo.",
        ),
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::LeadSquared,
        category: IntegrationCategory::Crm,
        name: "LeadSquared",
        description: "Leadsquared is a leader in marketing automation. Using our Leadsquared source, we will ingest your Program, Campaign, Person and List records into Factors.",
        icon: "LeadSquared",
        kb_link: Some("https://help.factors.ai/en/articles/7283684-leadsquared-integration"),
        instructions: details(
            "Enter your LeadSquared access key, secret key and host and then click Connect Now to connect your LeadSquared account to Factors.",
        ),
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::G2,
        category: IntegrationCategory::Review,
        name: "G2",
        description: "Sync G2 intent data with Factors for a complete look at buyer intent",
        icon: "g2crowd",
        kb_link: None,
        instructions: details(
            "Enter your G2 API key to connect Factors to G2 and bring in intent data. You can find your G2 API key by going inside \u{201c}Integrations\u{201d} in your G2 admin portal and then creating a new API token. Once created, copy the API token from G2 and enter it here to authorise the connection.",
        ),
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::Slack,
        category: IntegrationCategory::Communication,
        name: "Slack",
        description: "Does your team live on Slack? Set up alerts that track KPIs and marketing data. Nudge your team to take the right actions.",
        icon: "Slack",
        kb_link: Some("https://help.factors.ai/en/articles/7283808-slack-integration"),
        instructions: details(
            "Click Connect Now, you will be redirected to authorise the connection between Factors and Slack.",
        ),
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::MicrosoftTeams,
        category: IntegrationCategory::Communication,
        name: "Microsoft Teams",
        description: "Does your team live on Teams? Set up alerts that track KPIs and marketing data. Nudge your team to take the right actions.",
        icon: "MSTeam",
        kb_link: Some("https://help.factors.ai/en/articles/7913152-microsoft-teams-integration"),
        instructions: details(
            "Click Connect Now, you will be redirected to authorise the connection between Factors and Microsoft Teams.",
        ),
        internal_only: true,
    },
    IntegrationDescriptor {
        id: IntegrationId::Segment,
        category: IntegrationCategory::Cdp,
        name: "Segment",
        description: "Segment is a Customer Data Platform (CDP) that simplifies collecting and using data from the users of your digital properties and SaaS applications",
        icon: "Segment_ads",
        kb_link: Some("https://help.factors.ai/en/articles/7261994-segment-integration"),
        instructions: details(
            "First, take your API key and configure Factors as a destination in your Segment Workspace. Once done, enable all the data sources inside Segment that you would like to send to Factors. We start bringing in data only once you've completed these steps.",
        ),
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::Rudderstack,
        category: IntegrationCategory::Cdp,
        name: "Rudderstack",
        description: "Rudderstack is a Customer Data Platform (CDP) that simplifies collecting and using data from the users of your digital properties and SaaS applications",
        icon: "Rudderstack_ads",
        kb_link: Some("https://help.factors.ai/en/articles/7283693-rudderstack-integration"),
        instructions: details(
            "First, take your API key and configure Factors as a destination in your Rudderstack Workspace. Once done, enable all the data sources inside Rudderstack that you would like to send to Factors. We start bringing in data only once you've completed these steps.",
        ),
        internal_only: false,
    },
    IntegrationDescriptor {
        id: IntegrationId::Drift,
        category: IntegrationCategory::Chatbot,
        name: "Drift",
        description: "Track events and conversions from Drift\u{2019}s chat solution on the website",
        icon: "DriftLogo",
        kb_link: None,
        instructions: details(
            "Click Enable Now and Factors will start reading data from your Drift SDK.",
        ),
        internal_only: false,
    },
];

/// Static catalog of integration descriptors.
#[derive(Debug, Clone)]
pub struct IntegrationRegistry {
    descriptors: Vec<IntegrationDescriptor>,
}

impl Default for IntegrationRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IntegrationRegistry {
    /// Every supported provider, in display order.
    pub fn builtin() -> Self {
        Self::from_descriptors(CATALOG.to_vec())
    }

    /// Registry over an explicit list. Order is preserved.
    pub fn from_descriptors(descriptors: Vec<IntegrationDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Every entry in display order.
    pub fn all(&self) -> &[IntegrationDescriptor] {
        &self.descriptors
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Lookup by id.
    pub fn get(&self, id: IntegrationId) -> DomainResult<&IntegrationDescriptor> {
        self.descriptors
            .iter()
            .find(|descriptor| descriptor.id == id)
            .ok_or_else(|| DomainError::IntegrationNotFound(id.to_string()))
    }

    /// Lookup by string id, as it arrives from a route or the command line.
    pub fn find(&self, id: &str) -> DomainResult<&IntegrationDescriptor> {
        let id = id
            .parse::<IntegrationId>()
            .map_err(|_| DomainError::IntegrationNotFound(id.to_string()))?;
        self.get(id)
    }

    /// Entries under `category`, in display order.
    pub fn by_category(&self, category: IntegrationCategory) -> Vec<&IntegrationDescriptor> {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.category == category)
            .collect()
    }

    /// Categories that have at least one entry, in sort order.
    pub fn categories(&self) -> Vec<IntegrationCategory> {
        let mut categories: Vec<IntegrationCategory> = IntegrationCategory::ALL
            .into_iter()
            .filter(|category| self.descriptors.iter().any(|d| d.category == *category))
            .collect();
        categories.sort_by_key(|category| category.sort_order());
        categories
    }
}
