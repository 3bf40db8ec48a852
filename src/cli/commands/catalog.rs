//! Catalog browsing commands. These never touch the backend.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, truncate, CommandOutput, TableFormatter};
use crate::domain::models::IntegrationDescriptor;
use crate::services::{filter_integrations, CategorySelection, IntegrationRegistry};

/// Result of the `catalog` command.
#[derive(Debug, Serialize)]
pub struct CatalogListOutput {
    /// Selected category
    pub category: String,
    /// Search text
    pub query: String,
    /// Matching entries
    pub integrations: Vec<IntegrationDescriptor>,
    /// Number of matches
    pub total: usize,
}

impl CommandOutput for CatalogListOutput {
    fn to_human(&self) -> String {
        if self.integrations.is_empty() {
            return "No integrations match.".to_string();
        }
        let rows: Vec<&IntegrationDescriptor> = self.integrations.iter().collect();
        format!(
            "Found {} integration(s):\n{}",
            self.total,
            TableFormatter::new().format_catalog(&rows)
        )
    }
}

/// One row of the `categories` command.
#[derive(Debug, Serialize)]
pub struct CategoryOutput {
    /// Category id
    pub id: String,
    /// Tab title
    pub name: String,
    /// Entries in the category
    pub integrations: usize,
}

/// Result of the `categories` command.
#[derive(Debug, Serialize)]
pub struct CategoryListOutput {
    /// Categories in tab order
    pub categories: Vec<CategoryOutput>,
}

impl CommandOutput for CategoryListOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("{:<24} {:<32} {}", "ID", "NAME", "INTEGRATIONS")];
        lines.push("-".repeat(70));
        for category in &self.categories {
            lines.push(format!(
                "{:<24} {:<32} {}",
                category.id,
                truncate(&category.name, 30),
                category.integrations
            ));
        }
        lines.join("\n")
    }
}

/// List catalog entries matching the tab and search.
pub fn execute(category: CategorySelection, query: &str, json: bool) -> Result<()> {
    let registry = IntegrationRegistry::builtin();
    let integrations: Vec<IntegrationDescriptor> =
        filter_integrations(registry.all(), category, query)
            .into_iter()
            .cloned()
            .collect();

    let out = CatalogListOutput {
        category: category.to_string(),
        query: query.to_string(),
        total: integrations.len(),
        integrations,
    };
    output(&out, json);
    Ok(())
}

/// List categories with entry counts.
pub fn execute_categories(json: bool) -> Result<()> {
    let registry = IntegrationRegistry::builtin();
    let categories = registry
        .categories()
        .into_iter()
        .map(|category| CategoryOutput {
            id: category.as_str().to_string(),
            name: category.display_name().to_string(),
            integrations: registry.by_category(category).len(),
        })
        .collect();

    output(&CategoryListOutput { categories }, json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalog_output() {
        let out = CatalogListOutput {
            category: "all".to_string(),
            query: "myspace".to_string(),
            integrations: Vec::new(),
            total: 0,
        };
        assert_eq!(out.to_human(), "No integrations match.");
        assert_eq!(out.to_json()["query"], "myspace");
    }
}
