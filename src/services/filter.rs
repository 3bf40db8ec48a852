//! Category and free-text narrowing of the catalog.
//!
//! A non-empty search query takes priority over the selected category: the
//! category is ignored while text is present rather than intersected with it.

use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;
use crate::domain::models::{IntegrationCategory, IntegrationDescriptor};

/// Category tab selected on the settings page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategorySelection {
    /// Every category
    #[default]
    All,
    /// One category
    Only(IntegrationCategory),
}

impl CategorySelection {
    /// `"all"` or a category id, case-insensitive.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        raw.parse::<IntegrationCategory>().map(Self::Only)
    }

    /// Whether `category` is shown under this tab.
    pub fn matches(self, category: IntegrationCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == category,
        }
    }
}

impl FromStr for CategorySelection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(category) => f.write_str(category.as_str()),
        }
    }
}

/// Narrow `descriptors` by search text or, when there is none, by category.
pub fn filter_integrations<'a>(
    descriptors: &'a [IntegrationDescriptor],
    selection: CategorySelection,
    query: &str,
) -> Vec<&'a IntegrationDescriptor> {
    let needle = query.trim().to_lowercase();
    if !needle.is_empty() {
        return descriptors
            .iter()
            .filter(|descriptor| {
                descriptor.name.to_lowercase().contains(&needle)
                    || descriptor.description.to_lowercase().contains(&needle)
            })
            .collect();
    }

    descriptors
        .iter()
        .filter(|descriptor| selection.matches(descriptor.category))
        .collect()
}
